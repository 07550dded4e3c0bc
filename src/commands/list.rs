//! List documents

use anyhow::Result;

use crate::Blog;

/// Print every document, newest first
pub fn run(blog: &Blog) -> Result<()> {
    let report = blog.load()?;
    for line in lines(blog, &report.store) {
        println!("{}", line);
    }
    for failure in &report.failures {
        tracing::warn!("Skipped: {}", failure);
    }
    Ok(())
}

fn lines(blog: &Blog, store: &crate::content::ContentStore) -> Vec<String> {
    let mut lines = vec![format!("Documents ({}):", store.len())];
    for id in store.list() {
        // Ids come from the store itself, lookup cannot miss
        if let Ok(doc) = store.get(id.as_str()) {
            lines.push(format!(
                "  {} - {} [{}]",
                doc.pub_date().format(&blog.config.date_format),
                doc.title(),
                id
            ));
        }
    }
    lines
}
