//! Error types for makepub operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building an EPUB package.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Configuration problems: missing required field, unsupported config
    /// extension, unparseable config. Reported before any output is written.
    #[error("config error: {0}")]
    Config(String),

    /// A referenced content, cover, or media path could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Resource {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn resource(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Resource {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
