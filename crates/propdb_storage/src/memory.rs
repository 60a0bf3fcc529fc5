//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;

/// An in-memory snapshot backend.
///
/// This backend keeps the blob in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that dump/reload within one process
///
/// # Example
///
/// ```rust
/// use propdb_storage::{InMemoryBackend, StorageBackend};
///
/// let mut backend = InMemoryBackend::new();
/// backend.write_all(b"snapshot").unwrap();
/// assert_eq!(backend.read_all().unwrap(), b"snapshot");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    blob: RwLock<Option<Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-loaded with an existing blob.
    ///
    /// Useful for testing load paths against handcrafted bytes.
    #[must_use]
    pub fn with_blob(blob: Vec<u8>) -> Self {
        Self {
            blob: RwLock::new(Some(blob)),
        }
    }

    /// Returns true if a blob has been written.
    #[must_use]
    pub fn has_blob(&self) -> bool {
        self.blob.read().is_some()
    }

    /// Clears the stored blob.
    pub fn clear(&mut self) {
        *self.blob.write() = None;
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_all(&self) -> StorageResult<Vec<u8>> {
        self.blob.read().clone().ok_or(StorageError::Empty)
    }

    fn write_all(&mut self, data: &[u8]) -> StorageResult<()> {
        *self.blob.write() = Some(data.to_vec());
        Ok(())
    }

    fn sync(&mut self) -> StorageResult<()> {
        Ok(())
    }
}
