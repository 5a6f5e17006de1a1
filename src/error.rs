use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum Dir2TxtError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Operation cancelled")]
    Cancelled,
}
impl Dir2TxtError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Dir2TxtError::Io {
            path: path.into(),
            source,
        }
    }
    /// Returns `true` when the error is the cooperative-stop signal rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Dir2TxtError::Cancelled)
    }
}
