//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;
use crate::content::DocumentId;

/// Characters left as-is inside a path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Absolute URL for a root-relative URL produced by [`url_for`]
pub fn absolute_url(config: &SiteConfig, url: &str) -> String {
    format!("{}{}", config.url.trim_end_matches('/'), url)
}

/// Percent-encode each segment of a `/`-separated path
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Output directory of a document, relative to the public directory
pub fn document_dir(config: &SiteConfig, id: &DocumentId) -> String {
    let blog_dir = config.blog_dir.trim_matches('/');
    if blog_dir.is_empty() {
        id.to_string()
    } else {
        format!("{}/{}", blog_dir, id)
    }
}

/// Root-relative URL of a document page
pub fn document_url(config: &SiteConfig, id: &DocumentId) -> String {
    url_for(config, &format!("{}/", encode_path(&document_dir(config, id))))
}

/// Root-relative URL of a file published next to a document page
pub fn document_asset_url(config: &SiteConfig, id: &DocumentId, file_name: &str) -> String {
    url_for(
        config,
        &encode_path(&format!("{}/{}", document_dir(config, id), file_name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/notes/".to_string();
        config
    }

    fn id(path: &str) -> DocumentId {
        DocumentId::from_relative_path(Path::new(path)).unwrap()
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/notes/css/style.css");
        assert_eq!(url_for(&config, "about/"), "/notes/about/");
        assert_eq!(url_for(&config, ""), "/notes/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "https://example.com/notes/about/"
        );
    }

    #[test]
    fn test_absolute_url() {
        let config = test_config();
        let url = url_for(&config, "blog/post/");
        assert_eq!(absolute_url(&config, &url), "https://example.com/notes/blog/post/");
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("blog/my pic.png"), "blog/my%20pic.png");
        assert_eq!(encode_path("a-b_c.d~e"), "a-b_c.d~e");
    }

    #[test]
    fn test_document_urls() {
        let config = test_config();
        let id = id("guides/Angular DI.md");
        assert_eq!(document_url(&config, &id), "/notes/blog/guides/angular-di/");
        assert_eq!(
            document_asset_url(&config, &id, "hero image.png"),
            "/notes/blog/guides/angular-di/hero%20image.png"
        );
    }

    #[test]
    fn test_empty_blog_dir() {
        let mut config = test_config();
        config.blog_dir = String::new();
        assert_eq!(document_url(&config, &id("post.md")), "/notes/post/");
    }
}
