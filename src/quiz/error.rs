use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BankError>;

/// Failures reaching the question bank on disk.
///
/// These stay inside the crate: catalog and loader turn them into warnings and
/// return an empty result for the affected scope.
#[derive(Error, Debug)]
pub enum BankError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid question document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}
