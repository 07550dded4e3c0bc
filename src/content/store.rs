//! Content store - the read-only set of documents loaded from the content directory

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{Document, DocumentId};
use crate::error::ContentError;

/// Outcome of loading a content directory: the documents that parsed and
/// validated, and one entry per failure for the ones that did not
#[derive(Debug, Default)]
pub struct LoadReport {
    pub store: ContentStore,
    pub failures: Vec<ContentError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Log every failure against its file and field
    pub fn log_failures(&self) {
        for failure in &self.failures {
            tracing::error!("{}", failure);
        }
    }
}

/// Documents ordered newest first, with lookup by id
#[derive(Debug, Default)]
pub struct ContentStore {
    documents: Vec<Document>,
    index: HashMap<DocumentId, usize>,
}

impl ContentStore {
    /// Load every markdown file under `content_dir`.
    ///
    /// A document that fails to parse or references a missing image is left
    /// out and reported in [`LoadReport::failures`]; the others still load.
    pub fn load(content_dir: &Path, static_dir: &Path) -> Result<LoadReport> {
        if !content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", content_dir);
            return Ok(LoadReport::default());
        }

        let mut documents = Vec::new();
        let mut failures = Vec::new();
        let mut seen: HashMap<DocumentId, PathBuf> = HashMap::new();

        let walker = WalkDir::new(content_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_excluded(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Error walking content directory: {}", err);
                    let path = err.path().unwrap_or(content_dir).to_path_buf();
                    failures.push(ContentError::Io {
                        path,
                        source: err.into(),
                    });
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            match load_document(path, content_dir, static_dir) {
                Ok(doc) => {
                    if let Some(first) = seen.get(&doc.id) {
                        failures.push(ContentError::malformed(
                            path,
                            "id",
                            format!("`{}` is already used by {}", doc.id, first.display()),
                        ));
                        continue;
                    }
                    tracing::debug!("Loaded {} from {:?}", doc.id, path);
                    seen.insert(doc.id.clone(), path.to_path_buf());
                    documents.push(doc);
                }
                Err(errors) => failures.extend(errors),
            }
        }

        tracing::info!(
            "Loaded {} documents ({} failed)",
            documents.len(),
            failures.len()
        );

        Ok(LoadReport {
            store: ContentStore::from_documents(documents),
            failures,
        })
    }

    /// Build a store from already parsed documents. Later duplicates of an id are dropped.
    pub fn from_documents(mut documents: Vec<Document>) -> Self {
        let mut ids = HashSet::new();
        documents.retain(|doc| ids.insert(doc.id.clone()));
        // Newest first; ties broken by id so the order never depends on discovery
        documents.sort_by(|a, b| b.date().cmp(&a.date()).then_with(|| a.id.cmp(&b.id)));

        let index = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| (doc.id.clone(), i))
            .collect();

        Self { documents, index }
    }

    /// Document ids, newest first
    pub fn list(&self) -> Vec<&DocumentId> {
        self.documents.iter().map(|d| &d.id).collect()
    }

    /// Look up a document by id
    pub fn get(&self, id: &str) -> Result<&Document, ContentError> {
        self.index
            .get(id)
            .map(|&i| &self.documents[i])
            .ok_or_else(|| ContentError::NotFound { id: id.to_string() })
    }

    /// Documents, newest first
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// The document published right before `id`, if any
    pub fn older(&self, id: &DocumentId) -> Option<&Document> {
        let &i = self.index.get(id)?;
        self.documents.get(i + 1)
    }

    /// The document published right after `id`, if any
    pub fn newer(&self, id: &DocumentId) -> Option<&Document> {
        let &i = self.index.get(id)?;
        i.checked_sub(1).and_then(|j| self.documents.get(j))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Load and validate a single document
fn load_document(
    path: &Path,
    content_dir: &Path,
    static_dir: &Path,
) -> std::result::Result<Document, Vec<ContentError>> {
    let content = fs::read_to_string(path).map_err(|source| {
        vec![ContentError::Io {
            path: path.to_path_buf(),
            source,
        }]
    })?;

    let relative = path.strip_prefix(content_dir).unwrap_or(path);
    let id = DocumentId::from_relative_path(relative).ok_or_else(|| {
        vec![ContentError::malformed(
            path,
            "id",
            "file name does not yield a usable identifier",
        )]
    })?;

    let doc = Document::parse(id, path, &content).map_err(|e| vec![e])?;

    let missing = doc.validate_assets(static_dir);
    if !missing.is_empty() {
        return Err(missing);
    }

    Ok(doc)
}

/// Hidden entries and `_`-prefixed entries are not content
fn is_excluded(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.') || s.starts_with('_'))
        .unwrap_or(false)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Site {
        _dir: TempDir,
        content: PathBuf,
        static_dir: PathBuf,
    }

    fn site() -> Site {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        let static_dir = dir.path().join("public");
        fs::create_dir_all(&content).unwrap();
        fs::create_dir_all(&static_dir).unwrap();
        Site {
            _dir: dir,
            content,
            static_dir,
        }
    }

    fn write_doc(dir: &Path, name: &str, title: &str, date: &str, hero: Option<&str>) {
        let hero = hero
            .map(|h| format!("heroImage: \"{}\"\n", h))
            .unwrap_or_default();
        let content = format!(
            "---\ntitle: \"{}\"\npubDate: \"{}\"\ndescription: \"about {}\"\n{}---\n# {}\n",
            title, date, title, hero, title
        );
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_list_is_newest_first() {
        let site = site();
        write_doc(&site.content, "old.md", "Old", "Jan 1 2024", None);
        write_doc(&site.content, "new.md", "New", "Jan 13 2026", None);
        write_doc(&site.content, "mid.md", "Mid", "2025-05-05", None);

        let report = ContentStore::load(&site.content, &site.static_dir).unwrap();
        assert!(report.is_clean());
        let ids: Vec<_> = report.store.list().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_list_is_idempotent() {
        let site = site();
        write_doc(&site.content, "b.md", "B", "Jan 1 2026", None);
        write_doc(&site.content, "a.md", "A", "Jan 1 2026", None);
        write_doc(&site.content, "nested/c.md", "C", "Feb 1 2026", None);

        let first = ContentStore::load(&site.content, &site.static_dir).unwrap();
        let second = ContentStore::load(&site.content, &site.static_dir).unwrap();
        assert_eq!(first.store.list(), second.store.list());
        assert_eq!(first.store.list(), first.store.list());

        let ids: Vec<_> = first.store.list().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["nested/c", "a", "b"]);
    }

    #[test]
    fn test_get_and_not_found() {
        let site = site();
        write_doc(&site.content, "hello.md", "Hello", "Jan 1 2026", None);

        let report = ContentStore::load(&site.content, &site.static_dir).unwrap();
        let doc = report.store.get("hello").unwrap();
        assert_eq!(doc.title(), "Hello");
        assert_eq!(doc.description(), "about Hello");

        let err = report.store.get("missing").unwrap_err();
        assert!(matches!(err, ContentError::NotFound { ref id } if id == "missing"));
    }

    #[test]
    fn test_malformed_document_does_not_stop_others() {
        let site = site();
        write_doc(&site.content, "good.md", "Good", "Jan 1 2026", None);
        fs::write(
            site.content.join("bad.md"),
            "---\npubDate: \"Jan 1 2026\"\ndescription: \"x\"\n---\nbody\n",
        )
        .unwrap();

        let report = ContentStore::load(&site.content, &site.static_dir).unwrap();
        assert_eq!(report.store.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].field(), Some("title"));
        assert!(report.failures[0].path().unwrap().ends_with("bad.md"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_does_not_stop_others() {
        let site = site();
        write_doc(&site.content, "good.md", "Good", "Jan 1 2026", None);
        std::os::unix::fs::symlink(site.content.join("gone.md"), site.content.join("broken.md"))
            .unwrap();

        let report = ContentStore::load(&site.content, &site.static_dir).unwrap();
        assert_eq!(report.store.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0], ContentError::Io { .. }));
        assert!(report.failures[0].path().unwrap().ends_with("broken.md"));
    }

    #[test]
    fn test_full_month_name_date() {
        let site = site();
        write_doc(&site.content, "long.md", "Long", "January 13 2026", None);
        write_doc(&site.content, "short.md", "Short", "Jan 12 2026", None);

        let report = ContentStore::load(&site.content, &site.static_dir).unwrap();
        assert!(report.is_clean(), "{:?}", report.failures);
        let ids: Vec<_> = report.store.list().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["long", "short"]);
    }

    #[test]
    fn test_hero_image_resolution() {
        let site = site();
        fs::write(site.content.join("a.png"), b"png").unwrap();
        fs::create_dir_all(site.static_dir.join("img")).unwrap();
        fs::write(site.static_dir.join("img/b.png"), b"png").unwrap();

        write_doc(&site.content, "local.md", "Local", "Jan 1 2026", Some("./a.png"));
        write_doc(&site.content, "rooted.md", "Rooted", "Jan 2 2026", Some("/img/b.png"));
        write_doc(&site.content, "missing.md", "Missing", "Jan 3 2026", Some("./nope.png"));

        let report = ContentStore::load(&site.content, &site.static_dir).unwrap();
        assert_eq!(report.store.len(), 2);
        assert_eq!(report.failures.len(), 1);
        match &report.failures[0] {
            ContentError::UnresolvedAsset { field, asset, .. } => {
                assert_eq!(field, "heroImage");
                assert_eq!(asset, "./nope.png");
            }
            other => panic!("unexpected failure: {other}"),
        }
    }

    #[test]
    fn test_duplicate_ids() {
        let site = site();
        write_doc(&site.content, "post.md", "One", "Jan 1 2026", None);
        write_doc(&site.content, "post.markdown", "Two", "Jan 2 2026", None);

        let report = ContentStore::load(&site.content, &site.static_dir).unwrap();
        assert_eq!(report.store.len(), 1);
        assert_eq!(report.failures[0].field(), Some("id"));
    }

    #[test]
    fn test_hidden_and_underscore_entries_skipped() {
        let site = site();
        write_doc(&site.content, "visible.md", "Visible", "Jan 1 2026", None);
        write_doc(&site.content, "_draft.md", "Draft", "Jan 1 2026", None);
        write_doc(&site.content, ".hidden/secret.md", "Secret", "Jan 1 2026", None);
        fs::write(site.content.join("notes.txt"), "not markdown").unwrap();

        let report = ContentStore::load(&site.content, &site.static_dir).unwrap();
        let ids: Vec<_> = report.store.list().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["visible"]);
    }

    #[test]
    fn test_missing_content_dir_is_empty() {
        let site = site();
        let report =
            ContentStore::load(&site.content.join("nowhere"), &site.static_dir).unwrap();
        assert!(report.store.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_neighbours() {
        let site = site();
        write_doc(&site.content, "a.md", "A", "Jan 1 2026", None);
        write_doc(&site.content, "b.md", "B", "Jan 2 2026", None);
        write_doc(&site.content, "c.md", "C", "Jan 3 2026", None);

        let store = ContentStore::load(&site.content, &site.static_dir)
            .unwrap()
            .store;
        let b = store.get("b").unwrap();
        assert_eq!(store.older(&b.id).unwrap().title(), "A");
        assert_eq!(store.newer(&b.id).unwrap().title(), "C");
        let c = store.get("c").unwrap();
        assert!(store.newer(&c.id).is_none());
    }
}
