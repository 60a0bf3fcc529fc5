//! Inverted property index.

use crate::compare::Predicate;
use crate::document::DocumentId;
use crate::error::CoreResult;
use propdb_codec::Value;
use std::collections::{HashMap, HashSet};

/// Nested index entries: property name -> value -> id set.
pub(crate) type IndexEntries = HashMap<String, HashMap<Value, HashSet<DocumentId>>>;

/// Inverted index over indexed document properties.
///
/// `PropertyIndex` maps each property name to the distinct values seen for
/// that property, and each value to the set of document ids holding it.
/// Empty value-sets and empty per-property maps are pruned immediately on
/// removal and never persist.
///
/// The index is derived state: the [`crate::Store`] keeps it consistent with
/// the document table across every mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyIndex {
    /// Property to value to document ids mapping.
    entries: IndexEntries,
    /// Total (property, value, id) triple count.
    count: usize,
}

impl PropertyIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an index from raw entries, recomputing the triple count.
    ///
    /// Empty value-sets and property maps in the input are dropped so the
    /// pruning invariant holds even for entries read from a snapshot.
    pub(crate) fn from_entries(mut entries: IndexEntries) -> Self {
        for values in entries.values_mut() {
            values.retain(|_, ids| !ids.is_empty());
        }
        entries.retain(|_, values| !values.is_empty());

        let count = entries
            .values()
            .flat_map(HashMap::values)
            .map(HashSet::len)
            .sum();
        Self { entries, count }
    }

    /// Raw entry map, for snapshot serialization.
    pub(crate) fn entries(&self) -> &IndexEntries {
        &self.entries
    }

    /// Inserts a `(property, value) -> id` entry, creating nested maps and
    /// sets as needed.
    pub fn insert(&mut self, prop: &str, value: Value, id: DocumentId) {
        let set = self
            .entries
            .entry(prop.to_string())
            .or_default()
            .entry(value)
            .or_default();
        if set.insert(id) {
            self.count += 1;
        }
    }

    /// Removes a `(property, value) -> id` entry, pruning empty value-sets
    /// and property maps.
    ///
    /// Returns true if the entry was present. Absent entries are tolerated:
    /// excluded properties never made it into the index in the first place.
    pub fn remove(&mut self, prop: &str, value: &Value, id: &DocumentId) -> bool {
        let Some(values) = self.entries.get_mut(prop) else {
            return false;
        };
        let Some(ids) = values.get_mut(value) else {
            return false;
        };
        if !ids.remove(id) {
            return false;
        }
        self.count -= 1;

        if ids.is_empty() {
            values.remove(value);
        }
        if values.is_empty() {
            self.entries.remove(prop);
        }
        true
    }

    /// Scans the distinct values indexed under `prop` and unions the id sets
    /// of every value accepted by `test`.
    ///
    /// The scan is O(distinct values for `prop`), not O(documents). An
    /// unindexed property yields an empty set.
    ///
    /// # Errors
    ///
    /// Propagates the first predicate failure, e.g. a malformed pattern.
    pub fn scan<P>(&self, prop: &str, test: &P, target: &Value) -> CoreResult<HashSet<DocumentId>>
    where
        P: Predicate + ?Sized,
    {
        let mut matches = HashSet::new();

        if let Some(values) = self.entries.get(prop) {
            for (value, ids) in values {
                if test.test(value, target)? {
                    matches.extend(ids.iter().copied());
                }
            }
        }

        Ok(matches)
    }

    /// Returns the ids of all documents with any indexed value for `prop`.
    #[must_use]
    pub fn ids_with_property(&self, prop: &str) -> HashSet<DocumentId> {
        let mut matches = HashSet::new();

        if let Some(values) = self.entries.get(prop) {
            for ids in values.values() {
                matches.extend(ids.iter().copied());
            }
        }

        matches
    }

    /// Checks whether an exact `(property, value) -> id` triple is present.
    #[must_use]
    pub fn contains_entry(&self, prop: &str, value: &Value, id: &DocumentId) -> bool {
        self.entries
            .get(prop)
            .and_then(|values| values.get(value))
            .is_some_and(|ids| ids.contains(id))
    }

    /// Checks whether any entry exists for a property.
    #[must_use]
    pub fn contains_property(&self, prop: &str) -> bool {
        self.entries.contains_key(prop)
    }

    /// Total number of `(property, value, id)` triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Comparison;

    #[test]
    fn insert_and_scan() {
        let mut index = PropertyIndex::new();
        let id = DocumentId::new();

        index.insert("name", Value::from("alice"), id);

        let found = index
            .scan("name", &Comparison::Eq, &Value::from("alice"))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains(&id));
    }

    #[test]
    fn scan_unindexed_property_is_empty() {
        let index = PropertyIndex::new();
        let found = index
            .scan("missing", &Comparison::Eq, &Value::Null)
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn duplicate_insert_is_idempotent() {
        let mut index = PropertyIndex::new();
        let id = DocumentId::new();

        index.insert("k", Value::Integer(1), id);
        index.insert("k", Value::Integer(1), id);

        assert_eq!(index.len(), 1);
    }

    #[test]
    fn multiple_ids_share_a_value() {
        let mut index = PropertyIndex::new();
        let id1 = DocumentId::new();
        let id2 = DocumentId::new();

        index.insert("age", Value::Integer(30), id1);
        index.insert("age", Value::Integer(30), id2);

        let found = index
            .scan("age", &Comparison::Eq, &Value::Integer(30))
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn remove_prunes_empty_levels() {
        let mut index = PropertyIndex::new();
        let id = DocumentId::new();

        index.insert("k", Value::Integer(1), id);
        assert!(index.remove("k", &Value::Integer(1), &id));

        assert!(index.is_empty());
        assert!(!index.contains_property("k"));
    }

    #[test]
    fn remove_keeps_other_ids() {
        let mut index = PropertyIndex::new();
        let id1 = DocumentId::new();
        let id2 = DocumentId::new();

        index.insert("k", Value::Integer(1), id1);
        index.insert("k", Value::Integer(1), id2);

        index.remove("k", &Value::Integer(1), &id1);

        assert!(index.contains_entry("k", &Value::Integer(1), &id2));
        assert!(!index.contains_entry("k", &Value::Integer(1), &id1));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn remove_missing_entry_is_tolerated() {
        let mut index = PropertyIndex::new();
        let id = DocumentId::new();

        assert!(!index.remove("k", &Value::Integer(1), &id));

        index.insert("k", Value::Integer(1), id);
        assert!(!index.remove("k", &Value::Integer(2), &id));
        assert!(!index.remove("other", &Value::Integer(1), &id));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn ids_with_property_unions_all_values() {
        let mut index = PropertyIndex::new();
        let id1 = DocumentId::new();
        let id2 = DocumentId::new();

        index.insert("tag", Value::from("a"), id1);
        index.insert("tag", Value::from("b"), id2);

        let found = index.ids_with_property("tag");
        assert_eq!(found.len(), 2);
        assert!(index.ids_with_property("other").is_empty());
    }

    #[test]
    fn from_entries_prunes_and_counts() {
        let id = DocumentId::new();
        let mut entries: IndexEntries = HashMap::new();
        entries
            .entry("k".to_string())
            .or_default()
            .insert(Value::Integer(1), HashSet::from([id]));
        entries
            .entry("k".to_string())
            .or_default()
            .insert(Value::Integer(2), HashSet::new());
        entries.entry("empty".to_string()).or_default();

        let index = PropertyIndex::from_entries(entries);

        assert_eq!(index.len(), 1);
        assert!(!index.contains_property("empty"));
        assert!(index.contains_entry("k", &Value::Integer(1), &id));
        assert!(!index.contains_entry("k", &Value::Integer(2), &id));
    }

    #[test]
    fn clear_resets_count() {
        let mut index = PropertyIndex::new();
        index.insert("a", Value::Integer(1), DocumentId::new());
        index.insert("b", Value::Integer(2), DocumentId::new());

        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }
}
