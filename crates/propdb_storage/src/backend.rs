//! Storage backend trait definition.

use crate::error::StorageResult;

/// A snapshot byte store for PropDB.
///
/// Backends hold exactly one blob at a time. `write_all` replaces the
/// previous blob in full; `read_all` returns exactly the bytes last written.
///
/// # Invariants
///
/// - `read_all` after `write_all(data)` returns `data`
/// - `read_all` on a backend that was never written fails with
///   [`crate::StorageError::Empty`]
/// - a failed `write_all` must leave the previously readable blob intact
///   where the medium permits it
pub trait StorageBackend: Send + Sync {
    /// Reads the entire current snapshot blob.
    ///
    /// # Errors
    ///
    /// Returns an error if no blob is present or an I/O error occurs.
    fn read_all(&self) -> StorageResult<Vec<u8>>;

    /// Replaces the stored blob with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn write_all(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Ensures all written data is durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;
}
