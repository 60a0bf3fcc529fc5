//! # PropDB Testkit
//!
//! Test utilities for PropDB.
//!
//! This crate provides:
//! - Property-based test generators using proptest
//! - A reference model mirroring store mutations, with a bidirectional
//!   table/index consistency check driven through the public query surface
//!
//! ## Usage
//!
//! ```rust,ignore
//! use propdb_testkit::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_property(doc in document_strategy()) {
//!         // ... exercise a Store against a StoreModel
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod generators;
pub mod model;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::generators::*;
    pub use crate::model::*;
}

pub use generators::*;
pub use model::*;
