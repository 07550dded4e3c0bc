//! Development server

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::commands::build;
use crate::Blog;

/// Serve the public directory, optionally rebuilding when sources change
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let app = router(blog);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    if watch {
        let base_dir = blog.base_dir.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = build::watch(&base_dir, || {}) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Static file router over the public directory
fn router(blog: &Blog) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(&blog.public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}
