//! Content errors
//!
//! Every failure a document can cause is reported against the file and the
//! field at fault. None of them are recovered from: a failing document is
//! left out of the build and the build as a whole is marked as failed.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or looking up documents
#[derive(Debug, Error)]
pub enum ContentError {
    /// Metadata missing, empty or unparsable
    #[error("{}: malformed `{field}`: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        field: String,
        reason: String,
    },

    /// A referenced image does not exist
    #[error("{}: unresolved asset in `{field}`: {asset} does not exist", .path.display())]
    UnresolvedAsset {
        path: PathBuf,
        field: String,
        asset: String,
    },

    #[error("document not found: {id}")]
    NotFound { id: String },

    #[error("{}: failed to read file", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    pub(crate) fn malformed(
        path: impl Into<PathBuf>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            path: path.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unresolved(
        path: impl Into<PathBuf>,
        field: impl Into<String>,
        asset: impl Into<String>,
    ) -> Self {
        Self::UnresolvedAsset {
            path: path.into(),
            field: field.into(),
            asset: asset.into(),
        }
    }

    /// The field at fault, if the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Malformed { field, .. } | Self::UnresolvedAsset { field, .. } => Some(field),
            Self::NotFound { .. } | Self::Io { .. } => None,
        }
    }

    /// The file at fault, if the error is tied to one
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Malformed { path, .. }
            | Self::UnresolvedAsset { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::NotFound { .. } => None,
        }
    }
}
