//! Error types for PropDB core.

use crate::document::DocumentId;
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in PropDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] propdb_storage::StorageError),

    /// CBOR codec error.
    #[error("codec error: {0}")]
    Codec(#[from] propdb_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An indexed property name or value cannot be indexed.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the rejected input.
        message: String,
    },

    /// A snapshot blob is malformed or incompatible.
    #[error("invalid snapshot format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// Document not found.
    #[error("document not found: {id}")]
    DocumentNotFound {
        /// The identifier that was not found.
        id: DocumentId,
    },

    /// Property not present on the targeted document.
    #[error("property not found: {property}")]
    PropertyNotFound {
        /// Name of the missing property.
        property: String,
    },

    /// Invalid comparator input, e.g. a malformed pattern.
    #[error("query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
}

impl CoreError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates a document-not-found error.
    #[must_use]
    pub fn not_found(id: DocumentId) -> Self {
        Self::DocumentNotFound { id }
    }

    /// Creates a property-not-found error.
    pub fn property_not_found(property: impl Into<String>) -> Self {
        Self::PropertyNotFound {
            property: property.into(),
        }
    }

    /// Creates a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}
