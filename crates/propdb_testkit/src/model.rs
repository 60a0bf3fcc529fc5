//! Reference model for store behavior.
//!
//! [`StoreModel`] mirrors every mutation applied to a real
//! [`propdb_core::Store`] in plain maps, then [`StoreModel::check`] compares
//! the two through the store's public query surface. Exact set equality on
//! every query gives the bidirectional consistency guarantee: every stored
//! non-excluded property/value pair is reachable through the index, and the
//! index holds nothing else.
//!
//! The check is only valid for operation sequences where an indexed property
//! overwrite is preceded by `remove_prop` - the store deliberately does not
//! retract stale entries on overwrite.

use propdb_core::{Comparison, Document, DocumentId, Store, Value};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A per-document model row: the document plus its excluded property names.
#[derive(Debug, Clone)]
struct ModelRow {
    doc: Document,
    excluded: BTreeSet<String>,
}

/// In-memory mirror of a store's expected contents.
#[derive(Debug, Clone, Default)]
pub struct StoreModel {
    docs: BTreeMap<DocumentId, ModelRow>,
}

impl StoreModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of modeled documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns true if the model is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Returns the modeled document ids.
    #[must_use]
    pub fn ids(&self) -> Vec<DocumentId> {
        self.docs.keys().copied().collect()
    }

    /// Mirrors `Store::add` / `Store::add_with_id`.
    pub fn insert(&mut self, id: DocumentId, doc: Document, excluded: &[String]) {
        self.docs.insert(
            id,
            ModelRow {
                doc,
                excluded: excluded.iter().cloned().collect(),
            },
        );
    }

    /// Mirrors `Store::remove`.
    pub fn remove(&mut self, id: &DocumentId) {
        self.docs.remove(id);
    }

    /// Mirrors `Store::set_prop`.
    ///
    /// # Panics
    ///
    /// Panics if the id is not modeled; drive the model only with
    /// operations the store accepted.
    pub fn set_prop(&mut self, id: &DocumentId, prop: &str, value: Value, exclude: bool) {
        let row = self.docs.get_mut(id).expect("set_prop on unmodeled id");
        row.doc.set(prop, value);
        if exclude {
            row.excluded.insert(prop.to_string());
        } else {
            row.excluded.remove(prop);
        }
    }

    /// Mirrors `Store::remove_prop`.
    ///
    /// # Panics
    ///
    /// Panics if the id is not modeled.
    pub fn remove_prop(&mut self, id: &DocumentId, prop: &str) {
        let row = self.docs.get_mut(id).expect("remove_prop on unmodeled id");
        row.doc.remove(prop);
        row.excluded.remove(prop);
    }

    /// Ids of documents holding `value` at `prop`, non-excluded.
    #[must_use]
    pub fn expected_matches(&self, prop: &str, value: &Value) -> HashSet<DocumentId> {
        self.docs
            .iter()
            .filter(|(_, row)| !row.excluded.contains(prop) && row.doc.get(prop) == Some(value))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Ids of documents with a non-excluded assignment of `prop`.
    #[must_use]
    pub fn expected_with_property(&self, prop: &str) -> HashSet<DocumentId> {
        self.docs
            .iter()
            .filter(|(_, row)| !row.excluded.contains(prop) && row.doc.contains(prop))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Every property name mentioned by any modeled document.
    #[must_use]
    pub fn property_universe(&self) -> BTreeSet<String> {
        self.docs
            .values()
            .flat_map(|row| row.doc.iter().map(|(prop, _)| prop.clone()))
            .collect()
    }

    /// Every distinct `(property, value)` assignment, excluded or not.
    #[must_use]
    pub fn assignment_universe(&self) -> BTreeSet<(String, Value)> {
        self.docs
            .values()
            .flat_map(|row| {
                row.doc
                    .iter()
                    .map(|(prop, value)| (prop.clone(), value.clone()))
            })
            .collect()
    }

    /// Asserts full agreement between the model and a real store.
    ///
    /// Checks, through the store's public surface only:
    /// - document count and per-id `access` results
    /// - exact equality of every equality query over the assignment universe
    /// - exact equality of every `query_prop` over the property universe
    ///
    /// # Panics
    ///
    /// Panics on any divergence.
    pub fn check(&self, store: &Store) {
        assert_eq!(store.len(), self.len(), "document count diverged");

        for (id, row) in &self.docs {
            let docs = store.access([id]);
            assert_eq!(docs.len(), 1, "document {id} not accessible");
            assert_eq!(docs[0], row.doc, "document {id} content diverged");
        }

        for (prop, value) in self.assignment_universe() {
            let got = store
                .query(&prop, &Comparison::Eq, &value)
                .expect("equality query failed");
            let expected = self.expected_matches(&prop, &value);
            assert_eq!(got, expected, "equality query diverged for {prop:?}");
        }

        for prop in self.property_universe() {
            let got = store.query_prop(&prop);
            let expected = self.expected_with_property(&prop);
            assert_eq!(got, expected, "query_prop diverged for {prop:?}");
        }
    }
}
