//! CLI entry point for quire

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quire::commands;
use quire::Blog;

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "A small static blog engine for markdown articles", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new document
    New {
        /// Title of the new document
        title: String,

        /// File name (relative to the content directory, without extension)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Generate static files
    #[command(alias = "b")]
    Build {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Validate every document without writing output
    Check,

    /// List documents, newest first
    List,

    /// Start a local server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4321")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Do not rebuild on file changes
        #[arg(long)]
        r#static: bool,
    },

    /// Remove the generated output
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "quire=debug,info"
    } else {
        "quire=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::New { title, path } => {
            let blog = Blog::new(&base_dir)?;
            let file = commands::new::create_document(&blog, &title, path.as_deref())?;
            println!("Created: {}", file.display());
        }

        Commands::Build { watch } => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");
            let result = blog.build();

            if watch {
                if let Err(e) = &result {
                    tracing::error!("{:#}", e);
                }
                tokio::task::spawn_blocking(move || commands::build::watch(&base_dir, || {}))
                    .await??;
            } else {
                result?;
                println!("Generated successfully!");
            }
        }

        Commands::Check => {
            let blog = Blog::new(&base_dir)?;
            blog.check()?;
        }

        Commands::List => {
            let blog = Blog::new(&base_dir)?;
            commands::list::run(&blog)?;
        }

        Commands::Serve { port, ip, r#static } => {
            let blog = Blog::new(&base_dir)?;

            // Generate first; a failing document should not keep the others from being served
            tracing::info!("Generating static files...");
            if let Err(e) = blog.build() {
                tracing::error!("{:#}", e);
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            quire::server::start(&blog, &ip, port, !r#static).await?;
        }

        Commands::Clean => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("quire version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
