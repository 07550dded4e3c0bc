//! Content module - documents, their front matter, and the store that holds them

mod blocks;
mod date;
mod document;
mod frontmatter;
mod markdown;
pub mod store;

pub use blocks::Block;
pub use date::PubDate;
pub use document::{AssetRef, Document, DocumentId};
pub use frontmatter::{FieldError, FrontMatter, FRONT_MATTER_FIELD};
pub use markdown::MarkdownRenderer;
pub use store::{ContentStore, LoadReport};
