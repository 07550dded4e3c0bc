//! Build the static site

use anyhow::{bail, Result};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::config::CONFIG_FILE;
use crate::content::LoadReport;
use crate::generator::Generator;
use crate::Blog;

/// Load, validate and generate.
///
/// Every document that loads is rendered; if any document failed, each
/// failure is reported and the build as a whole returns an error.
pub fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();

    let report = blog.load()?;
    let generator = Generator::new(blog)?;
    generator.generate(&report.store)?;

    tracing::info!(
        "Generated {} documents in {:.2}s",
        report.store.len(),
        start.elapsed().as_secs_f64()
    );

    ensure_clean(&report)
}

/// Turn load failures into an error after reporting each of them
pub fn ensure_clean(report: &LoadReport) -> Result<()> {
    if report.is_clean() {
        return Ok(());
    }
    report.log_failures();
    bail!("{} document(s) failed to build", report.failures.len())
}

/// Watch content, static files and the config, rebuilding on every change.
/// Blocks until the watcher shuts down.
pub fn watch(base_dir: &Path, on_rebuild: impl Fn()) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(300), tx)?;

    for path in watched_paths(base_dir)? {
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant(&e.path))
                    .collect();
                if changed.is_empty() {
                    continue;
                }
                for event in &changed {
                    tracing::info!("Changed: {}", event.path.display());
                }

                // Re-read the config too, it may be what changed
                match Blog::new(base_dir).and_then(|blog| run(&blog)) {
                    Ok(()) => {
                        tracing::info!("Rebuilt successfully");
                        on_rebuild();
                    }
                    Err(e) => tracing::error!("Rebuild failed: {:#}", e),
                }
            }
            Ok(Err(e)) => tracing::error!("Watch error: {:?}", e),
            Err(_) => break,
        }
    }

    Ok(())
}

fn watched_paths(base_dir: &Path) -> Result<Vec<PathBuf>> {
    let blog = Blog::new(base_dir)?;
    Ok([
        blog.content_dir,
        blog.static_dir,
        base_dir.join(CONFIG_FILE),
    ]
    .into_iter()
    .filter(|p| p.exists())
    .collect())
}

/// Editor backups and VCS internals do not trigger rebuilds
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}
