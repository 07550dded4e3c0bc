//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary; a site needs nothing but content.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{ContentStore, Document};
use crate::helpers::{self, escape_html, strip_html, truncate};

const FOOTER: &str = "partials/footer.html";

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Tera's escaping also rewrites `/`, which mangles URLs; text fields
        // are escaped explicitly with the `escape_html` filter instead
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
            (FOOTER, include_str!("site/partials/footer.html")),
        ])?;

        tera.register_filter("escape_html", escape_html_filter);
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the site footer.
    ///
    /// Takes no input and reads nothing but its own template, so every call
    /// yields the same markup.
    pub fn fragment(&self) -> Result<String> {
        self.render(FOOTER, &Context::new())
    }

    /// Context shared by every page: site metadata and the footer
    pub fn base_context(&self, site: &SiteData) -> Result<Context> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("footer", &self.fragment()?);
        Ok(context)
    }
}

/// Tera filter: escape HTML special characters, leaving `/` alone
fn escape_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("escape_html", "value", String, value);
    Ok(tera::Value::String(escape_html(&s)))
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };
    Ok(tera::Value::String(truncate(&s, length, &omission)))
}

// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    /// Root-relative URL of the index page
    pub home: String,
    /// Root-relative URL of the RSS feed
    pub feed: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            home: helpers::url_for(config, ""),
            feed: helpers::url_for(config, "rss.xml"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentData {
    pub id: String,
    pub title: String,
    pub description: String,
    /// The authored `pubDate` string
    pub pub_date: String,
    pub date_iso: String,
    pub display_date: String,
    pub updated_date: Option<String>,
    pub url: String,
    pub hero_image: Option<String>,
    pub content: String,
    pub reading_time: usize,
}

impl DocumentData {
    /// Template view of a document. `content` is the rendered body and
    /// `hero_image` the already resolved image URL.
    pub fn new(
        config: &SiteConfig,
        doc: &Document,
        content: String,
        hero_image: Option<String>,
    ) -> Self {
        Self {
            id: doc.id.to_string(),
            title: doc.title().to_string(),
            description: doc.description().to_string(),
            pub_date: doc.pub_date().as_str().to_string(),
            date_iso: doc.pub_date().format("%Y-%m-%d"),
            display_date: doc.pub_date().format(&config.date_format),
            updated_date: doc.updated_date().map(|d| d.format(&config.date_format)),
            url: helpers::document_url(config, &doc.id),
            hero_image,
            reading_time: helpers::reading_time(&content),
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavDocument {
    pub title: String,
    pub url: String,
}

impl NavDocument {
    pub fn new(config: &SiteConfig, doc: &Document) -> Self {
        Self {
            title: doc.title().to_string(),
            url: helpers::document_url(config, &doc.id),
        }
    }
}

/// Previous/next links for a document page
pub fn navigation(
    config: &SiteConfig,
    store: &ContentStore,
    doc: &Document,
) -> (Option<NavDocument>, Option<NavDocument>) {
    (
        store.newer(&doc.id).map(|d| NavDocument::new(config, d)),
        store.older(&doc.id).map(|d| NavDocument::new(config, d)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_is_deterministic() {
        let renderer = TemplateRenderer::new().unwrap();
        let first = renderer.fragment().unwrap();
        let second = renderer.fragment().unwrap();
        assert_eq!(first, second);
        assert!(first.contains("<footer"));

        // A fresh renderer yields the same markup too
        let other = TemplateRenderer::new().unwrap();
        assert_eq!(other.fragment().unwrap(), first);
    }

    #[test]
    fn test_base_context_includes_footer() {
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteData::from_config(&SiteConfig::default());
        let context = renderer.base_context(&site).unwrap();
        let json = context.into_json();
        assert_eq!(json["site"]["title"], "My Blog");
        assert!(json["footer"].as_str().unwrap().contains("site-footer"));
    }

    #[test]
    fn test_render_index() {
        let renderer = TemplateRenderer::new().unwrap();
        let config = SiteConfig::default();
        let site = SiteData::from_config(&config);
        let mut context = renderer.base_context(&site).unwrap();
        context.insert("documents", &Vec::<DocumentData>::new());

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains("<title>My Blog</title>"));
        assert!(html.contains(r#"href="/rss.xml""#));
        assert!(html.contains("site-footer"));
    }

    #[test]
    fn test_filters() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(5));
        let out = truncate_chars_filter(&tera::Value::from("abcdefgh"), &args).unwrap();
        assert_eq!(out, tera::Value::from("abcde…"));

        let out = strip_html_filter(&tera::Value::from("<b>bold</b>"), &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::from("bold"));

        let out = escape_html_filter(&tera::Value::from("a & b/c"), &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::from("a &amp; b/c"));
    }
}
