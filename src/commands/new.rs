//! Create a new document

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::Blog;

const DEFAULT_SCAFFOLD: &str = r#"---
title: {{ title }}
pubDate: {{ date }}
description: {{ title }}
heroImage:
---
"#;

/// Create a document from `scaffolds/post.md`, or the built-in scaffold.
/// `path` overrides the file name, which otherwise is the slugified title.
pub fn create_document(blog: &Blog, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let name = match path {
        Some(p) => p.trim_end_matches(".md").to_string(),
        None => slug::slugify(title),
    };
    if name.is_empty() {
        bail!("Cannot derive a file name from {:?}", title);
    }

    let file_path = blog.content_dir.join(format!("{}.md", name));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let scaffold_path = blog.base_dir.join("scaffolds").join("post.md");
    let scaffold = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        DEFAULT_SCAFFOLD.to_string()
    };

    let today = chrono::Local::now().format("%b %-d %Y").to_string();
    let content = scaffold
        .replace("{{ title }}", &yaml_quote(title))
        .replace("{{ date }}", &yaml_quote(&today));

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Double-quoted YAML scalar
fn yaml_quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04X}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    #[test]
    fn test_new_document_parses() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let path = create_document(&blog, "Angular \"DI\" basics", None).unwrap();
        assert!(path.ends_with("angular-di-basics.md"));

        let content = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.title, "Angular \"DI\" basics");
        assert_eq!(fm.description, "Angular \"DI\" basics");
        assert!(content.contains("\nheroImage:"));
        assert_eq!(fm.hero_image, None);
    }

    #[test]
    fn test_title_with_control_characters_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        let title = "Line one\nline\ttwo \\ back";
        let path = create_document(&blog, title, Some("multi")).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.title, title);
    }

    #[test]
    fn test_new_document_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();

        create_document(&blog, "Same", None).unwrap();
        assert!(create_document(&blog, "Same", None).is_err());
    }

    #[test]
    fn test_custom_scaffold_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        fs::create_dir_all(dir.path().join("scaffolds")).unwrap();
        fs::write(
            dir.path().join("scaffolds/post.md"),
            "---\ntitle: {{ title }}\npubDate: {{ date }}\ndescription: \"Draft\"\nheroImage: \"../../assets/placeholder.jpg\"\n---\n",
        )
        .unwrap();

        let path = create_document(&blog, "Eat well", Some("diet/greens")).unwrap();
        assert!(path.ends_with("diet/greens.md"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("heroImage: \"../../assets/placeholder.jpg\""));
    }
}
