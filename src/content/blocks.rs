//! Top-level outline of a markdown body

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

/// One top-level block of a document body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    CodeFence { lang: Option<String>, code: String },
    List { ordered: bool, items: Vec<String> },
    /// A paragraph holding a single image and nothing else
    Image { src: String, alt: String },
    BlockQuote { text: String },
    Table { rows: usize },
    Rule,
    Html { html: String },
}

pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM
}

#[derive(Debug)]
enum Kind {
    Heading(u8),
    Paragraph,
    CodeFence(Option<String>),
    List(bool),
    BlockQuote,
    Table,
    Html,
    Other,
}

/// A block being assembled from parser events
#[derive(Debug)]
struct Pending {
    kind: Kind,
    text: String,
    items: Vec<String>,
    image: Option<(String, String)>,
    in_image: bool,
    rows: usize,
}

impl Pending {
    fn open(tag: &Tag) -> Self {
        let kind = match tag {
            Tag::Heading { level, .. } => Kind::Heading(*level as u8),
            Tag::Paragraph => Kind::Paragraph,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
                Kind::CodeFence(info.split_whitespace().next().map(str::to_string))
            }
            Tag::CodeBlock(_) => Kind::CodeFence(None),
            Tag::List(start) => Kind::List(start.is_some()),
            Tag::BlockQuote(_) => Kind::BlockQuote,
            Tag::Table(_) => Kind::Table,
            Tag::HtmlBlock => Kind::Html,
            _ => Kind::Other,
        };
        Self {
            kind,
            text: String::new(),
            items: Vec::new(),
            image: None,
            in_image: false,
            rows: 0,
        }
    }

    /// A tag opened inside this block; `depth` is the nesting level of the tag
    fn nested_start(&mut self, tag: &Tag, depth: usize) {
        match tag {
            Tag::Item if depth == 1 => self.items.push(String::new()),
            Tag::Image { dest_url, .. } => {
                if self.image.is_none() {
                    self.image = Some((dest_url.to_string(), String::new()));
                } else {
                    // A second image disqualifies the paragraph from being an image block
                    self.text.push(' ');
                }
                self.in_image = true;
            }
            Tag::TableHead | Tag::TableRow => self.rows += 1,
            Tag::Paragraph | Tag::Heading { .. } | Tag::CodeBlock(_) => self.separate(),
            _ => {}
        }
    }

    fn nested_end(&mut self, end: &TagEnd) {
        if matches!(end, TagEnd::Image) {
            self.in_image = false;
        }
    }

    fn separate(&mut self) {
        let target = self.target();
        if !target.is_empty() && !target.ends_with(char::is_whitespace) {
            target.push(' ');
        }
    }

    fn target(&mut self) -> &mut String {
        if matches!(self.kind, Kind::List(_)) {
            if let Some(item) = self.items.last_mut() {
                return item;
            }
        }
        &mut self.text
    }

    fn push_text(&mut self, text: &str) {
        if self.in_image {
            if let Some((_, alt)) = self.image.as_mut() {
                alt.push_str(text);
            }
            return;
        }
        self.target().push_str(text);
    }

    fn finish(self) -> Option<Block> {
        let block = match self.kind {
            Kind::Heading(level) => Block::Heading {
                level,
                text: self.text.trim().to_string(),
            },
            Kind::Paragraph => match self.image {
                Some((src, alt)) if self.text.trim().is_empty() => Block::Image { src, alt },
                _ => Block::Paragraph {
                    text: self.text.trim().to_string(),
                },
            },
            Kind::CodeFence(lang) => Block::CodeFence {
                lang,
                code: self.text,
            },
            Kind::List(ordered) => Block::List {
                ordered,
                items: self
                    .items
                    .into_iter()
                    .map(|item| item.trim().to_string())
                    .collect(),
            },
            Kind::BlockQuote => Block::BlockQuote {
                text: self.text.trim().to_string(),
            },
            Kind::Table => Block::Table { rows: self.rows },
            Kind::Html => Block::Html { html: self.text },
            Kind::Other => return None,
        };
        Some(block)
    }
}

/// Split a markdown body into its ordered top-level blocks
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut current: Option<Pending> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    current = Some(Pending::open(&tag));
                } else if let Some(pending) = current.as_mut() {
                    pending.nested_start(&tag, depth);
                }
                depth += 1;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(block) = current.take().and_then(Pending::finish) {
                        blocks.push(block);
                    }
                } else if let Some(pending) = current.as_mut() {
                    pending.nested_end(&end);
                }
            }
            Event::Text(text) | Event::Code(text) | Event::Html(text) | Event::InlineHtml(text) => {
                if let Some(pending) = current.as_mut() {
                    pending.push_text(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(pending) = current.as_mut() {
                    pending.push_text(" ");
                }
            }
            Event::Rule if depth == 0 => blocks.push(Block::Rule),
            _ => {}
        }
    }

    blocks
}

/// Every image destination in a markdown body, in document order
pub fn image_refs(markdown: &str) -> Vec<String> {
    Parser::new_ext(markdown, parser_options())
        .filter_map(|event| match event {
            Event::Start(Tag::Image { dest_url, .. }) => Some(dest_url.to_string()),
            _ => None,
        })
        .collect()
}

/// Every link destination in a markdown body, in document order
pub fn links(markdown: &str) -> Vec<String> {
    Parser::new_ext(markdown, parser_options())
        .filter_map(|event| match event {
            Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.to_string()),
            _ => None,
        })
        .collect()
}
