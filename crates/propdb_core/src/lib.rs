//! # PropDB Core
//!
//! An in-process, schema-less document store with an inverted property
//! index.
//!
//! Documents are key/value property bags identified by generated UUIDs. A
//! [`Store`] keeps two structures mutually consistent across every insert,
//! update, and delete:
//!
//! - a [`DocumentTable`] - the authoritative id-to-document mapping
//! - a [`PropertyIndex`] - property name to value to id-set, scanned by
//!   queries with an arbitrary comparison predicate
//!
//! Persistence is a best-effort snapshot dump/reload through the backends
//! in `propdb_storage`.
//!
//! ## Example
//!
//! ```
//! use propdb_core::{Comparison, Document, Store, Value};
//!
//! let mut store = Store::new();
//! store.add(Document::new().with("name", "ada").with("age", 36), &[])?;
//! store.add(Document::new().with("name", "brian").with("age", 70), &[])?;
//!
//! let ids = store.query("age", &Comparison::Lt, &Value::Integer(50))?;
//! let docs = store.access(&ids);
//! assert_eq!(docs.len(), 1);
//! # Ok::<(), propdb_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod compare;
mod document;
mod error;
mod index;
mod snapshot;
mod store;
mod table;

pub use compare::{Comparison, FnPredicate, Predicate};
pub use document::{Document, DocumentId};
pub use error::{CoreError, CoreResult};
pub use index::PropertyIndex;
pub use store::Store;
pub use table::DocumentTable;

pub use propdb_codec::Value;
