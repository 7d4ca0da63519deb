use std::{io, path::PathBuf};
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by snapshot storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A filesystem call on the snapshot failed.
    #[error("cannot {action} {}: {source}", .path.display())]
    Io {
        /// Operation that failed, e.g. `write` or `rename`.
        action: &'static str,
        /// File or directory involved.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// The game could not be encoded.
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl StorageError {
    /// Wrap an I/O failure with the action and path it concerned.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
