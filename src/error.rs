//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Every way a load, build or analysis step can fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("adjacency record not found: {}", path.display())]
    RecordNotFound { path: PathBuf },

    #[error("capture file not found: {}", path.display())]
    CaptureNotFound { path: PathBuf },

    #[error("graph document not found: {}", path.display())]
    GraphNotFound { path: PathBuf },

    #[error("invalid adjacency record: {0}")]
    InvalidRecord(String),

    #[error("invalid capture file: {0}")]
    InvalidCapture(String),

    #[error("invalid graph document: {0}")]
    InvalidGraph(String),

    #[error("user {0} not found in dataset")]
    UserNotFound(String),

    #[error("root node {0} not found in graph")]
    RootNotFound(String),

    #[error("I/O error: {source} (path: {})", path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps an I/O error with the path it happened on.
    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Error::Io {
            source,
            path: path.into(),
        }
    }
}
