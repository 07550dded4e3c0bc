//! Generator module - writes the static site using the built-in Tera templates

use anyhow::{Context as _, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::content::{AssetRef, ContentStore, Document, MarkdownRenderer};
use crate::helpers::{self, escape_xml, strip_html, strip_invalid_xml_chars};
use crate::templates::{navigation, DocumentData, SiteData, TemplateRenderer};
use crate::Blog;

/// Static site generator
pub struct Generator {
    config: SiteConfig,
    public_dir: PathBuf,
    static_dir: PathBuf,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            config: blog.config.clone(),
            public_dir: blog.public_dir.clone(),
            static_dir: blog.static_dir.clone(),
            renderer: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::with_config(&blog.config.highlight),
        })
    }

    /// Generate the entire site from a loaded store
    pub fn generate(&self, store: &ContentStore) -> Result<()> {
        fs::create_dir_all(&self.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.public_dir))?;

        self.prune_stale_pages(store)?;
        self.copy_static_files()?;

        let site = SiteData::from_config(&self.config);

        // Each document is rendered on its own; they share nothing but the site data
        let rendered = store
            .documents()
            .iter()
            .map(|doc| self.generate_document(store, doc, &site))
            .collect::<Result<Vec<_>>>()?;

        self.generate_index(&rendered, &site)?;
        self.generate_rss(store, &rendered)?;
        self.generate_search_index(&rendered)?;

        Ok(())
    }

    /// Render one document page and publish the images it references
    fn generate_document(
        &self,
        store: &ContentStore,
        doc: &Document,
        site: &SiteData,
    ) -> Result<DocumentData> {
        let out_dir = self
            .public_dir
            .join(helpers::document_dir(&self.config, &doc.id));
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create dir {:?}", out_dir))?;

        let assets = self.publish_assets(doc, &out_dir)?;

        let content = self
            .markdown
            .render_with_images(&doc.body, |url| assets.get(url).cloned());
        let hero_image = doc
            .hero_image()
            .map(|hero| assets.get(hero).cloned().unwrap_or_else(|| hero.to_string()));
        let data = DocumentData::new(&self.config, doc, content, hero_image);

        let (newer, older) = navigation(&self.config, store, doc);

        let mut context = self.renderer.base_context(site)?;
        context.insert("doc", &data);
        context.insert("newer", &newer);
        context.insert("older", &older);

        let html = self
            .renderer
            .render("post.html", &context)
            .with_context(|| format!("Failed to render {}", doc.id))?;

        let output_path = out_dir.join("index.html");
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated document: {:?}", output_path);

        Ok(data)
    }

    /// Copy local images next to the document page.
    /// Returns the published URL of each reference as written in the document.
    fn publish_assets(&self, doc: &Document, out_dir: &Path) -> Result<HashMap<String, String>> {
        let mut urls = HashMap::new();
        let mut names: HashMap<String, PathBuf> = HashMap::new();

        for (_, reference) in doc.asset_refs() {
            if urls.contains_key(&reference) {
                continue;
            }
            let AssetRef::Local(source) = AssetRef::resolve(&reference, doc.dir(), &self.static_dir)
            else {
                continue;
            };

            let name = output_name(&source, &mut names);
            let dest = out_dir.join(&name);
            fs::copy(&source, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", source, dest))?;

            urls.insert(
                reference,
                helpers::document_asset_url(&self.config, &doc.id, &name),
            );
        }

        Ok(urls)
    }

    /// Generate the index page, newest first
    fn generate_index(&self, documents: &[DocumentData], site: &SiteData) -> Result<()> {
        let mut context = self.renderer.base_context(site)?;
        context.insert("documents", documents);

        let html = self.renderer.render("index.html", &context)?;
        let output_path = self.public_dir.join("index.html");
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated index with {} documents", documents.len());

        Ok(())
    }

    /// Generate the RSS 2.0 feed
    fn generate_rss(&self, store: &ContentStore, documents: &[DocumentData]) -> Result<()> {
        let config = &self.config;
        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<rss version="2.0">"#);
        feed.push_str("\n<channel>\n");
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <description>{}</description>\n",
            escape_xml(&config.description)
        ));
        feed.push_str(&format!(
            "  <link>{}</link>\n",
            escape_xml(&helpers::full_url_for(config, ""))
        ));
        feed.push_str(&format!(
            "  <language>{}</language>\n",
            escape_xml(&config.language)
        ));

        for (doc, data) in store
            .documents()
            .iter()
            .zip(documents)
            .take(config.feed_limit)
        {
            let link = helpers::absolute_url(config, &data.url);
            feed.push_str("  <item>\n");
            feed.push_str(&format!(
                "    <title>{}</title>\n",
                escape_xml(&strip_invalid_xml_chars(&data.title))
            ));
            feed.push_str(&format!("    <link>{}</link>\n", escape_xml(&link)));
            feed.push_str(&format!(
                "    <guid isPermaLink=\"true\">{}</guid>\n",
                escape_xml(&link)
            ));
            feed.push_str(&format!(
                "    <description>{}</description>\n",
                escape_xml(&strip_invalid_xml_chars(&data.description))
            ));
            feed.push_str(&format!(
                "    <pubDate>{}</pubDate>\n",
                doc.pub_date().to_rfc2822()
            ));
            feed.push_str("  </item>\n");
        }

        feed.push_str("</channel>\n</rss>\n");

        let output_path = self.public_dir.join("rss.xml");
        fs::write(&output_path, feed)?;
        tracing::debug!("Generated rss.xml");

        Ok(())
    }

    /// Generate search index (JSON)
    fn generate_search_index(&self, documents: &[DocumentData]) -> Result<()> {
        let search_data: Vec<serde_json::Value> = documents
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id,
                    "title": d.title,
                    "url": d.url,
                    "description": d.description,
                    "content": strip_html(&d.content),
                    "date": d.date_iso,
                })
            })
            .collect();

        let output_path = self.public_dir.join("search.json");
        let json = serde_json::to_string_pretty(&search_data)?;
        fs::write(&output_path, json)?;
        tracing::debug!("Generated search.json");

        Ok(())
    }

    /// Remove pages left from documents that are no longer in the store,
    /// whether their file was deleted or they failed to load this time
    fn prune_stale_pages(&self, store: &ContentStore) -> Result<()> {
        let blog_root = self.public_dir.join(self.config.blog_dir.trim_matches('/'));
        if !blog_root.is_dir() {
            return Ok(());
        }

        let mut stale = Vec::new();
        let mut walker = WalkDir::new(&blog_root).min_depth(1).into_iter();
        while let Some(entry) = walker.next() {
            let entry = entry?;
            if !entry.file_type().is_dir() || !entry.path().join("index.html").is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&blog_root)?;
            let id = relative.to_string_lossy().replace('\\', "/");
            if store.get(&id).is_err() {
                stale.push(entry.path().to_path_buf());
                walker.skip_current_dir();
            }
        }

        for dir in &stale {
            fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {:?}", dir))?;
            tracing::info!("Removed stale page {:?}", dir);
        }
        Ok(())
    }

    /// Copy the static directory into the public directory as-is
    fn copy_static_files(&self) -> Result<()> {
        if !self.static_dir.is_dir() {
            return Ok(());
        }

        let mut copied = 0usize;
        for entry in WalkDir::new(&self.static_dir).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&self.static_dir)?;
            let dest = self.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)
                .with_context(|| format!("Failed to copy {:?}", entry.path()))?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(())
    }
}

/// Pick a file name for a published image that does not clash with the
/// page itself or with a different image already published for the document
fn output_name(source: &Path, names: &mut HashMap<String, PathBuf>) -> String {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "asset".to_string());

    let mut candidate = file_name.clone();
    let mut n = 1;
    loop {
        let taken = candidate == "index.html"
            || names.get(&candidate).is_some_and(|existing| existing != source);
        if !taken {
            break;
        }
        candidate = format!("{}-{}", n, file_name);
        n += 1;
    }

    names.insert(candidate.clone(), source.to_path_buf());
    candidate
}
