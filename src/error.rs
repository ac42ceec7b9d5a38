use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid date '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("failed to write dates to {}: {reason}", path.display())]
    MetadataWrite { path: PathBuf, reason: String },

    #[error("failed to start exiftool: {0}")]
    ExifToolStart(String),
}

impl FixError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FixError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FixError>;
