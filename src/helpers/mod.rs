//! Helper functions shared by the generator and templates

mod text;
mod url;

pub use text::*;
pub use url::*;
