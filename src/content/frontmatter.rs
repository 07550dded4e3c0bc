//! Front-matter parsing
//!
//! A document starts with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: "Angular DI in depth"
//! pubDate: "Jan 13 2026"
//! description: "Providers, injectors and tokens"
//! heroImage: "../../assets/di.png"
//! ---
//! # Body
//! ```
//!
//! `title`, `pubDate` and `description` are required and must not be empty.

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use super::PubDate;
use crate::error::ContentError;

const DELIMITER: &str = "---";

/// Field name reported when the block itself is missing or invalid
pub const FRONT_MATTER_FIELD: &str = "front matter";

/// A front-matter failure tied to a field, not yet to a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Attach the file the error came from
    pub fn at(self, path: &Path) -> ContentError {
        ContentError::malformed(path, self.field, self.reason)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.field, self.reason)
    }
}

impl std::error::Error for FieldError {}

/// Front-matter data of a document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: String,
    pub pub_date: PubDate,
    pub description: String,
    /// Relative path (or URL) of the hero image
    pub hero_image: Option<String>,
    pub updated_date: Option<PubDate>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), FieldError> {
        let (yaml, body) = split(content)?;

        let value: Value = serde_yaml::from_str(yaml)
            .map_err(|e| FieldError::new(FRONT_MATTER_FIELD, format!("invalid YAML: {}", e)))?;

        let mut map = match value {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            _ => {
                return Err(FieldError::new(
                    FRONT_MATTER_FIELD,
                    "expected key-value pairs",
                ))
            }
        };

        let title = required(&mut map, "title")?;
        let pub_date = required_date(&mut map, "pubDate")?;
        let description = required(&mut map, "description")?;
        let hero_image = optional(&mut map, "heroImage")?;
        let updated_date = match optional(&mut map, "updatedDate")? {
            Some(raw) => Some(
                PubDate::parse(&raw)
                    .ok_or_else(|| FieldError::new("updatedDate", unparsable_date(&raw)))?,
            ),
            None => None,
        };

        let extra = map
            .into_iter()
            .filter_map(|(k, v)| match k {
                Value::String(k) => Some((k, v)),
                _ => None,
            })
            .collect();

        Ok((
            FrontMatter {
                title,
                pub_date,
                description,
                hero_image,
                updated_date,
                extra,
            },
            body,
        ))
    }
}

/// Split a file into its YAML block and its body
fn split(content: &str) -> Result<(&str, &str), FieldError> {
    let content = content.trim_start_matches('\u{feff}');
    let content = content.trim_start_matches(['\n', '\r', ' ', '\t']);

    let Some(after_open) = strip_delimiter_line(content) else {
        return Err(FieldError::new(
            FRONT_MATTER_FIELD,
            "missing opening `---` line",
        ));
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(FieldError::new(
        FRONT_MATTER_FIELD,
        "missing closing `---` line",
    ))
}

/// If `s` starts with a delimiter line, return what follows it
fn strip_delimiter_line(s: &str) -> Option<&str> {
    let (first, rest) = match s.find('\n') {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    };
    (first.trim_end() == DELIMITER).then_some(rest)
}

/// Read a scalar as text; `Ok(None)` when absent or null
fn optional(map: &mut Mapping, field: &str) -> Result<Option<String>, FieldError> {
    match map.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(FieldError::new(field, "expected a string")),
    }
}

fn required(map: &mut Mapping, field: &str) -> Result<String, FieldError> {
    match optional(map, field)? {
        None => Err(FieldError::new(field, "missing required field")),
        Some(s) if s.trim().is_empty() => Err(FieldError::new(field, "must not be empty")),
        Some(s) => Ok(s),
    }
}

fn required_date(map: &mut Mapping, field: &str) -> Result<PubDate, FieldError> {
    let raw = required(map, field)?;
    PubDate::parse(&raw).ok_or_else(|| FieldError::new(field, unparsable_date(&raw)))
}

fn unparsable_date(raw: &str) -> String {
    format!("unparsable date {:?}", raw)
}
