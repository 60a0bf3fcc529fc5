//! # PropDB Storage
//!
//! Snapshot storage backends for PropDB.
//!
//! A backend is an **opaque byte sink/source**: the store hands it one
//! serialized snapshot blob and later reads the whole blob back. Backends do
//! not understand the snapshot format; PropDB owns all interpretation.
//!
//! ## Implementations
//!
//! - [`InMemoryBackend`] - for tests and ephemeral stores
//! - [`FileBackend`] - whole-file snapshot on disk, replaced atomically

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
