//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::SiteConfig;

/// Name of the site configuration file, relative to the base directory
pub const CONFIG_FILE: &str = "quire.yml";
