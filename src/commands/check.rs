//! Validate content without writing output

use anyhow::Result;

use super::build::ensure_clean;
use crate::Blog;

/// Load every document and report what is wrong with it
pub fn run(blog: &Blog) -> Result<()> {
    let report = blog.load()?;
    ensure_clean(&report)?;
    println!("{} documents OK", report.store.len());
    Ok(())
}
