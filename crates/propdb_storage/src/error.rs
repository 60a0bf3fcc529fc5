//! Error types for the storage crate.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error from the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No snapshot has been written to this backend yet.
    #[error("no snapshot present")]
    Empty,
}
