//! Error types.
//!
//! Every failure that aborts a scan is an [`Error`]. Findings reported by the
//! scanning service are *not* errors; they travel as
//! [`Diagnostic`](crate::finding::Diagnostic)s and only influence the exit
//! status after the report has been written.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed YAML in a file that was explicitly handed to a resolver.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: yaml_rust2::ScanError,
    },

    /// Valid YAML that does not have the shape the entity kind requires.
    #[error("Unexpected structure in {}: {message}", path.display())]
    Structure { path: PathBuf, message: String },

    /// A supplied path does not match the kind its entity type needs.
    #[error("{} is not a valid {expected}", path.display())]
    InvalidPath { path: PathBuf, expected: &'static str },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The scanning service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    RemoteCall { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service returned more findings than tasks were submitted.
    #[error("API returned {returned} results for {requested} submitted tasks")]
    ResponseLength { requested: usize, returned: usize },

    #[error("Failed to read credentials: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0}")]
    Config(String),
}

impl Error {
    pub(crate) fn structure(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Structure {
            path: path.into(),
            message: message.into(),
        }
    }
}
