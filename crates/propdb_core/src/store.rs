//! Store facade coordinating the document table and property index.

use crate::compare::Predicate;
use crate::document::{Document, DocumentId};
use crate::error::{CoreError, CoreResult};
use crate::index::PropertyIndex;
use crate::snapshot;
use crate::table::DocumentTable;
use propdb_codec::Value;
use propdb_storage::StorageBackend;
use std::collections::HashSet;
use tracing::{debug, trace};

/// An in-process document store with an inverted property index.
///
/// The `Store` owns two structures and never lets them diverge:
///
/// - the **document table**, the authoritative id-to-document mapping
/// - the **property index**, mapping property name to value to id-set
///
/// Every mutation touches both in lockstep; validation happens before any
/// mutation, so a rejected call leaves no partial state. Queries read only
/// the index and resolve to full documents on demand.
///
/// # Example
///
/// ```
/// use propdb_core::{Comparison, Document, Store, Value};
///
/// let mut store = Store::new();
/// let id = store.add(Document::new().with("name", "ada").with("age", 36), &[])?;
///
/// let hits = store.query("age", &Comparison::Ge, &Value::Integer(30))?;
/// assert!(hits.contains(&id));
/// # Ok::<(), propdb_core::CoreError>(())
/// ```
///
/// # Concurrency
///
/// The store is single-threaded by construction: mutations take `&mut self`
/// and run to completion. Callers that share a store across threads must
/// wrap the whole store in one lock so a mutation appears atomic to readers.
#[derive(Clone, Default, PartialEq)]
pub struct Store {
    /// Authoritative id-to-document mapping.
    table: DocumentTable,
    /// Derived inverted index over non-excluded properties.
    index: PropertyIndex,
}

impl Store {
    /// Creates an empty store, immediately usable with no configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Checks whether a document id is present.
    #[must_use]
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.table.contains(id)
    }

    /// Returns an independent copy of one document, if present.
    #[must_use]
    pub fn get(&self, id: &DocumentId) -> Option<Document> {
        self.table.get(id).cloned()
    }

    /// Resolves identifiers to independent document copies.
    ///
    /// Missing identifiers are skipped silently; the result follows the
    /// input order and may be shorter than the input. This is the
    /// best-effort batch read shape: absence is expressed through a smaller
    /// result, never an error.
    pub fn access<'a, I>(&self, ids: I) -> Vec<Document>
    where
        I: IntoIterator<Item = &'a DocumentId>,
    {
        ids.into_iter()
            .filter_map(|id| self.table.get(id).cloned())
            .collect()
    }

    /// Adds a document, generating a fresh identifier for it.
    ///
    /// Properties named in `exclude` are stored but kept out of the index.
    /// All other property values must be indexable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if any non-excluded property holds
    /// a non-indexable value. Validation runs before any mutation, so a
    /// rejected document leaves both structures untouched.
    pub fn add(&mut self, doc: Document, exclude: &[&str]) -> CoreResult<DocumentId> {
        Self::validate(&doc, exclude)?;
        Ok(self.insert_unchecked(DocumentId::new(), doc, exclude))
    }

    /// Adds a document under a caller-supplied identifier.
    ///
    /// This is the replace-in-place building block: [`Store::replace`] uses
    /// it to re-insert under the original id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the id is already taken or the
    /// document fails indexability validation.
    pub fn add_with_id(
        &mut self,
        id: DocumentId,
        doc: Document,
        exclude: &[&str],
    ) -> CoreResult<DocumentId> {
        if self.table.contains(&id) {
            return Err(CoreError::validation(format!(
                "document id {id} already exists"
            )));
        }
        Self::validate(&doc, exclude)?;
        Ok(self.insert_unchecked(id, doc, exclude))
    }

    /// Creates or overwrites one property on a document.
    ///
    /// When `exclude` is false the new `(property, value) -> id` entry is
    /// added to the index.
    ///
    /// **Caveat**: overwriting an indexed property does *not* retract the
    /// index entry for its previous value. Callers that need the old entry
    /// gone must call [`Store::remove_prop`] first.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DocumentNotFound`] if the id is absent and
    /// [`CoreError::Validation`] if the value is not indexable while
    /// `exclude` is false. Neither failure mutates any state.
    pub fn set_prop(
        &mut self,
        id: DocumentId,
        prop: &str,
        value: Value,
        exclude: bool,
    ) -> CoreResult<()> {
        let Some(doc) = self.table.get_mut(&id) else {
            return Err(CoreError::not_found(id));
        };
        if !exclude && !value.is_indexable() {
            return Err(CoreError::validation(format!(
                "value for indexed property {prop:?} is not indexable"
            )));
        }

        doc.set(prop, value.clone());
        if !exclude {
            self.index.insert(prop, value, id);
        }
        trace!(%id, prop, exclude, "property set");
        Ok(())
    }

    /// Removes one property from a document.
    ///
    /// If the document's id is present in the index entry for the removed
    /// `(property, value)` pair, the entry is retracted and empty levels are
    /// pruned. Excluded properties simply have no entry to retract.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DocumentNotFound`] if the id is absent and
    /// [`CoreError::PropertyNotFound`] if the property is not on the
    /// document. Both failures leave all state untouched.
    pub fn remove_prop(&mut self, id: DocumentId, prop: &str) -> CoreResult<()> {
        let Some(doc) = self.table.get_mut(&id) else {
            return Err(CoreError::not_found(id));
        };
        let Some(old) = doc.remove(prop) else {
            return Err(CoreError::property_not_found(prop));
        };

        self.index.remove(prop, &old, &id);
        trace!(%id, prop, "property removed");
        Ok(())
    }

    /// Removes a document, retracting all of its index entries.
    ///
    /// Returns the removed document.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DocumentNotFound`] if the id is absent, leaving
    /// all state untouched.
    pub fn remove(&mut self, id: DocumentId) -> CoreResult<Document> {
        let Some(doc) = self.table.remove(&id) else {
            return Err(CoreError::not_found(id));
        };
        for (prop, value) in doc.iter() {
            self.index.remove(prop, value, &id);
        }
        debug!(%id, "document removed");
        Ok(doc)
    }

    /// Replaces a document in place, preserving its identifier.
    ///
    /// Equivalent to [`Store::remove`] followed by [`Store::add_with_id`],
    /// except that the replacement is validated *first*: if the new document
    /// is rejected, the old one stays fully intact and indexed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DocumentNotFound`] if the id is absent and
    /// [`CoreError::Validation`] if the replacement fails indexability
    /// validation.
    pub fn replace(&mut self, id: DocumentId, doc: Document, exclude: &[&str]) -> CoreResult<()> {
        if !self.table.contains(&id) {
            return Err(CoreError::not_found(id));
        }
        Self::validate(&doc, exclude)?;

        self.remove(id)?;
        self.insert_unchecked(id, doc, exclude);
        debug!(%id, "document replaced");
        Ok(())
    }

    /// Finds the ids of all documents whose indexed value for `prop` passes
    /// `test` against `target`.
    ///
    /// This scans the distinct values indexed under `prop` - O(distinct
    /// values), not O(documents) - and unions the matching id-sets. An
    /// unindexed property yields an empty set. The returned set is fresh on
    /// every call and never aliases internal state.
    ///
    /// Composed queries should combine id-sets with ordinary set algebra and
    /// resolve once at the end via [`Store::access`].
    ///
    /// # Errors
    ///
    /// Propagates predicate failures as [`CoreError::Query`].
    pub fn query<P>(&self, prop: &str, test: &P, target: &Value) -> CoreResult<HashSet<DocumentId>>
    where
        P: Predicate + ?Sized,
    {
        self.index.scan(prop, test, target)
    }

    /// Like [`Store::query`], but resolves matches to document copies.
    ///
    /// The result order is unspecified.
    ///
    /// # Errors
    ///
    /// Propagates predicate failures as [`CoreError::Query`].
    pub fn query_resolved<P>(
        &self,
        prop: &str,
        test: &P,
        target: &Value,
    ) -> CoreResult<Vec<Document>>
    where
        P: Predicate + ?Sized,
    {
        let ids = self.query(prop, test, target)?;
        Ok(self.access(&ids))
    }

    /// Finds the ids of all documents with any indexed value for `prop`.
    #[must_use]
    pub fn query_prop(&self, prop: &str) -> HashSet<DocumentId> {
        self.index.ids_with_property(prop)
    }

    /// Like [`Store::query_prop`], but resolves matches to document copies.
    #[must_use]
    pub fn query_prop_resolved(&self, prop: &str) -> Vec<Document> {
        let ids = self.query_prop(prop);
        self.access(&ids)
    }

    /// Clears all documents and index entries. Never fails.
    pub fn reset(&mut self) {
        self.table.clear();
        self.index.clear();
        debug!("store reset");
    }

    /// Serializes the store into `backend` as one versioned snapshot blob.
    ///
    /// The backend is synced after the write, so a successful `save` means
    /// the snapshot is as durable as the backend can make it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Codec`] if serialization fails and
    /// [`CoreError::Storage`] on write or sync failure.
    pub fn save(&self, backend: &mut dyn StorageBackend) -> CoreResult<()> {
        let blob = snapshot::encode(&self.table, &self.index)?;
        backend.write_all(&blob)?;
        backend.sync()?;
        debug!(bytes = blob.len(), documents = self.len(), "snapshot saved");
        Ok(())
    }

    /// Replaces the store's contents from a snapshot blob in `backend`.
    ///
    /// The blob is read and decoded in full before either structure is
    /// touched: on any failure the store keeps its prior state and the
    /// caller may retry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] on stream failure and
    /// [`CoreError::InvalidFormat`] if the blob is malformed or
    /// incompatible.
    pub fn load(&mut self, backend: &dyn StorageBackend) -> CoreResult<()> {
        let blob = backend.read_all()?;
        let (table, index) = snapshot::decode(&blob)?;

        self.table = table;
        self.index = index;
        debug!(documents = self.len(), "snapshot loaded");
        Ok(())
    }

    /// Rejects documents whose non-excluded properties hold non-indexable
    /// values. Runs before any mutation.
    fn validate(doc: &Document, exclude: &[&str]) -> CoreResult<()> {
        for (prop, value) in doc.iter() {
            if exclude.contains(&prop.as_str()) {
                continue;
            }
            if !value.is_indexable() {
                return Err(CoreError::validation(format!(
                    "indexed property {prop:?} holds a non-indexable value"
                )));
            }
        }
        Ok(())
    }

    /// Inserts a pre-validated document under `id` and indexes its
    /// non-excluded properties. Cannot fail, so the table and index always
    /// move together.
    fn insert_unchecked(&mut self, id: DocumentId, doc: Document, exclude: &[&str]) -> DocumentId {
        for (prop, value) in doc.iter() {
            if exclude.contains(&prop.as_str()) {
                continue;
            }
            self.index.insert(prop, value.clone(), id);
        }
        self.table.insert(id, doc);
        debug!(%id, "document added");
        id
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("documents", &self.table.len())
            .field("index_entries", &self.index.len())
            .finish_non_exhaustive()
    }
}
