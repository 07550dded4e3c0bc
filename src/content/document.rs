//! Document model

use chrono::NaiveDate;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::blocks::{self, Block};
use super::{FrontMatter, PubDate};
use crate::error::ContentError;

/// Identity of a document: its path inside the content directory,
/// without extension, each segment slugified (`guides/angular-di`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Derive an id from a path relative to the content directory
    pub fn from_relative_path(relative: &Path) -> Option<Self> {
        let stem = relative.with_extension("");
        let segments: Vec<String> = stem
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(slug::slugify(s.to_string_lossy())),
                _ => None,
            })
            .collect();

        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DocumentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where an image reference points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    /// A file on disk
    Local(PathBuf),
    /// Served from elsewhere; not checked
    Remote(String),
}

impl AssetRef {
    /// Resolve an image reference written in a document.
    ///
    /// Relative references are resolved against the document's directory;
    /// `/`-prefixed ones against the static directory.
    pub fn resolve(reference: &str, document_dir: &Path, static_dir: &Path) -> Self {
        let reference = reference.trim();
        if reference.contains("://") || reference.starts_with("//") || reference.starts_with("data:") {
            return AssetRef::Remote(reference.to_string());
        }

        let without_suffix = reference
            .split(['?', '#'])
            .next()
            .unwrap_or(reference);
        let decoded = percent_decode_str(without_suffix).decode_utf8_lossy();

        match decoded.strip_prefix('/') {
            Some(rooted) => AssetRef::Local(static_dir.join(rooted)),
            None => AssetRef::Local(document_dir.join(&*decoded)),
        }
    }
}

/// A single article: metadata header plus markdown body
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: DocumentId,

    /// Full source file path
    #[serde(skip)]
    pub source: PathBuf,

    #[serde(flatten)]
    pub front_matter: FrontMatter,

    /// Raw markdown body
    #[serde(skip)]
    pub body: String,
}

impl Document {
    /// Parse a content file. Malformed metadata is reported against `source`.
    pub fn parse(id: DocumentId, source: &Path, content: &str) -> Result<Self, ContentError> {
        let (front_matter, body) = FrontMatter::parse(content).map_err(|e| e.at(source))?;
        Ok(Self {
            id,
            source: source.to_path_buf(),
            front_matter,
            body: body.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.front_matter.title
    }

    pub fn description(&self) -> &str {
        &self.front_matter.description
    }

    pub fn pub_date(&self) -> &PubDate {
        &self.front_matter.pub_date
    }

    /// Calendar date used for ordering
    pub fn date(&self) -> NaiveDate {
        self.front_matter.pub_date.date()
    }

    pub fn updated_date(&self) -> Option<&PubDate> {
        self.front_matter.updated_date.as_ref()
    }

    pub fn hero_image(&self) -> Option<&str> {
        self.front_matter.hero_image.as_deref()
    }

    /// Directory relative references are resolved against
    pub fn dir(&self) -> &Path {
        self.source.parent().unwrap_or_else(|| Path::new("."))
    }

    /// The body as ordered top-level blocks
    pub fn blocks(&self) -> Vec<Block> {
        blocks::parse_blocks(&self.body)
    }

    /// Image destinations referenced from the body
    pub fn image_refs(&self) -> Vec<String> {
        blocks::image_refs(&self.body)
    }

    /// Link destinations referenced from the body
    pub fn links(&self) -> Vec<String> {
        blocks::links(&self.body)
    }

    /// Every image reference with the field it came from
    pub fn asset_refs(&self) -> Vec<(&'static str, String)> {
        let mut refs = Vec::new();
        if let Some(hero) = self.hero_image() {
            refs.push(("heroImage", hero.to_string()));
        }
        for image in self.image_refs() {
            refs.push(("body", image));
        }
        refs
    }

    /// Check that every local image this document references exists
    pub fn validate_assets(&self, static_dir: &Path) -> Vec<ContentError> {
        let mut errors = Vec::new();
        for (field, reference) in self.asset_refs() {
            if let AssetRef::Local(path) = AssetRef::resolve(&reference, self.dir(), static_dir) {
                if !path.is_file() {
                    errors.push(ContentError::unresolved(&self.source, field, reference));
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_path() {
        let id = DocumentId::from_relative_path(Path::new("First Post.md")).unwrap();
        assert_eq!(id.as_str(), "first-post");

        let id = DocumentId::from_relative_path(Path::new("guides/Angular DI.markdown")).unwrap();
        assert_eq!(id.as_str(), "guides/angular-di");
    }

    #[test]
    fn test_id_rejects_empty_segment() {
        assert!(DocumentId::from_relative_path(Path::new("!!!.md")).is_none());
        assert!(DocumentId::from_relative_path(Path::new("")).is_none());
    }

    #[test]
    fn test_asset_ref_resolution() {
        let doc_dir = Path::new("/site/src/content/blog");
        let static_dir = Path::new("/site/public");

        assert_eq!(
            AssetRef::resolve("./a.png", doc_dir, static_dir),
            AssetRef::Local(doc_dir.join("./a.png"))
        );
        assert_eq!(
            AssetRef::resolve("/img/b.png", doc_dir, static_dir),
            AssetRef::Local(static_dir.join("img/b.png"))
        );
        assert_eq!(
            AssetRef::resolve("./my%20pic.png?v=2", doc_dir, static_dir),
            AssetRef::Local(doc_dir.join("./my pic.png"))
        );
        assert_eq!(
            AssetRef::resolve("https://cdn.example.com/c.png", doc_dir, static_dir),
            AssetRef::Remote("https://cdn.example.com/c.png".to_string())
        );
    }

    #[test]
    fn test_parse_attaches_path_to_errors() {
        let id = DocumentId::from_relative_path(Path::new("broken.md")).unwrap();
        let content = "---\npubDate: Jan 1 2026\ndescription: x\n---\n";
        let err = Document::parse(id, Path::new("blog/broken.md"), content).unwrap_err();
        match err {
            ContentError::Malformed { path, field, .. } => {
                assert_eq!(path, Path::new("blog/broken.md"));
                assert_eq!(field, "title");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hero.png"), b"png").unwrap();
        let source = dir.path().join("post.md");
        let content = "---\ntitle: T\npubDate: Jan 1 2026\ndescription: x\nheroImage: ./hero.png\n---\n![gone](./gone.png)\n![remote](https://example.com/x.png)\n";
        let id = DocumentId::from_relative_path(Path::new("post.md")).unwrap();
        let doc = Document::parse(id, &source, content).unwrap();

        let errors = doc.validate_assets(dir.path());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), Some("body"));
        assert!(errors[0].to_string().contains("./gone.png"));
    }
}
