//! Authoritative document table.

use crate::document::{Document, DocumentId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The authoritative identifier-to-document mapping.
///
/// Every identifier referenced anywhere in the property index must exist
/// here; the [`crate::Store`] maintains that invariant by mutating the table
/// and the index in lockstep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTable {
    rows: HashMap<DocumentId, Document>,
}

impl DocumentTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document, returning the previous one if the id was taken.
    pub fn insert(&mut self, id: DocumentId, doc: Document) -> Option<Document> {
        self.rows.insert(id, doc)
    }

    /// Gets a document by id.
    #[must_use]
    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.rows.get(id)
    }

    /// Gets a mutable document by id.
    pub fn get_mut(&mut self, id: &DocumentId) -> Option<&mut Document> {
        self.rows.get_mut(id)
    }

    /// Removes a document, returning it if it was present.
    pub fn remove(&mut self, id: &DocumentId) -> Option<Document> {
        self.rows.remove(id)
    }

    /// Checks whether an id is present.
    #[must_use]
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.rows.contains_key(id)
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Removes all documents.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Iterates over all id/document pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &Document)> {
        self.rows.iter()
    }
}
