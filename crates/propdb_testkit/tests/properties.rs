//! Property-based integration tests for the store.

use propdb_core::{Comparison, Document, DocumentId, Store, Value};
use propdb_storage::{FileBackend, InMemoryBackend};
use propdb_testkit::prelude::*;
use proptest::prelude::*;

/// One mutation in a generated operation sequence.
///
/// Document indices are taken modulo the number of live documents, so every
/// generated sequence is applicable to any store state.
#[derive(Debug, Clone)]
enum Op {
    Add(Document, Vec<String>),
    Remove(usize),
    SetProp(usize, String, Value),
    RemoveProp(usize, String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => document_with_exclusions_strategy().prop_map(|(doc, excl)| Op::Add(doc, excl)),
        1 => any::<usize>().prop_map(Op::Remove),
        2 => (any::<usize>(), property_name_strategy(), indexable_value_strategy())
            .prop_map(|(i, prop, value)| Op::SetProp(i, prop, value)),
        1 => (any::<usize>(), property_name_strategy())
            .prop_map(|(i, prop)| Op::RemoveProp(i, prop)),
    ]
}

fn as_excludes(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).collect()
}

proptest! {
    #[test]
    fn add_then_access_roundtrips(doc in document_strategy()) {
        let mut store = Store::new();
        let id = store.add(doc.clone(), &[]).unwrap();

        prop_assert_eq!(store.access([&id]), vec![doc]);
        prop_assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_shrinks_size_by_exactly_one(docs in document_batch_strategy(8)) {
        let mut store = Store::new();
        let mut ids = Vec::new();
        for doc in docs {
            ids.push(store.add(doc, &[]).unwrap());
        }

        if let Some(&victim) = ids.first() {
            let before = store.len();
            store.remove(victim).unwrap();

            prop_assert_eq!(store.len(), before - 1);
            prop_assert!(store.access([&victim]).is_empty());
        }
    }

    #[test]
    fn equality_queries_match_the_model(
        batch in prop::collection::vec(document_with_exclusions_strategy(), 0..8)
    ) {
        let mut store = Store::new();
        let mut model = StoreModel::new();

        for (doc, excluded) in batch {
            let id = store.add(doc.clone(), &as_excludes(&excluded)).unwrap();
            model.insert(id, doc, &excluded);
        }

        model.check(&store);
    }

    #[test]
    fn query_prop_is_invariant_to_insertion_order(docs in document_batch_strategy(6)) {
        let pairs: Vec<(DocumentId, Document)> = docs
            .into_iter()
            .map(|doc| (DocumentId::new(), doc))
            .collect();

        let mut forward = Store::new();
        for (id, doc) in &pairs {
            forward.add_with_id(*id, doc.clone(), &[]).unwrap();
        }

        let mut backward = Store::new();
        for (id, doc) in pairs.iter().rev() {
            backward.add_with_id(*id, doc.clone(), &[]).unwrap();
        }

        for prop in ["name", "age", "tag", "flag", "note"] {
            prop_assert_eq!(forward.query_prop(prop), backward.query_prop(prop));
        }
    }

    #[test]
    fn save_load_reproduces_the_store(
        batch in prop::collection::vec(document_with_exclusions_strategy(), 0..8)
    ) {
        let mut store = Store::new();
        for (doc, excluded) in batch {
            store.add(doc, &as_excludes(&excluded)).unwrap();
        }

        let mut backend = InMemoryBackend::new();
        store.save(&mut backend).unwrap();

        let mut restored = Store::new();
        restored.load(&backend).unwrap();

        prop_assert_eq!(restored, store);
    }

    #[test]
    fn excluded_properties_are_unsearchable(
        (doc, excluded) in document_with_exclusions_strategy()
    ) {
        let mut store = Store::new();
        let id = store.add(doc.clone(), &as_excludes(&excluded)).unwrap();

        let stored = store.get(&id).unwrap();
        for prop in &excluded {
            prop_assert_eq!(stored.get(prop), doc.get(prop));
            prop_assert!(store.query_prop(prop).is_empty());
        }
    }

    #[test]
    fn operation_sequences_keep_table_and_index_consistent(
        ops in prop::collection::vec(op_strategy(), 0..12)
    ) {
        let mut store = Store::new();
        let mut model = StoreModel::new();
        let mut live: Vec<DocumentId> = Vec::new();

        for op in ops {
            match op {
                Op::Add(doc, excluded) => {
                    let id = store.add(doc.clone(), &as_excludes(&excluded)).unwrap();
                    model.insert(id, doc, &excluded);
                    live.push(id);
                }
                Op::Remove(i) => {
                    if live.is_empty() {
                        continue;
                    }
                    let id = live.remove(i % live.len());
                    store.remove(id).unwrap();
                    model.remove(&id);
                }
                Op::SetProp(i, prop, value) => {
                    if live.is_empty() {
                        continue;
                    }
                    let id = live[i % live.len()];
                    // Retract the old entry first so the index keeps
                    // reflecting current document state.
                    if store.get(&id).unwrap().contains(&prop) {
                        store.remove_prop(id, &prop).unwrap();
                        model.remove_prop(&id, &prop);
                    }
                    store.set_prop(id, &prop, value.clone(), false).unwrap();
                    model.set_prop(&id, &prop, value, false);
                }
                Op::RemoveProp(i, prop) => {
                    if live.is_empty() {
                        continue;
                    }
                    let id = live[i % live.len()];
                    if store.get(&id).unwrap().contains(&prop) {
                        store.remove_prop(id, &prop).unwrap();
                        model.remove_prop(&id, &prop);
                    }
                }
            }
            model.check(&store);
        }
    }
}

#[test]
fn file_backend_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.pdb");

    let mut store = Store::new();
    store
        .add(Document::new().with("name", "a").with("age", 30), &[])
        .unwrap();
    store
        .add(
            Document::new().with("name", "b").with("blob", vec![1i64, 2]),
            &["blob"],
        )
        .unwrap();

    let mut backend = FileBackend::new(&path);
    store.save(&mut backend).unwrap();

    let mut restored = Store::new();
    restored.load(&backend).unwrap();

    assert_eq!(restored, store);
    let hits = restored
        .query("age", &Comparison::Eq, &Value::Integer(30))
        .unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn chained_queries_combine_id_sets_then_resolve() {
    let mut store = Store::new();
    let id1 = store
        .add(Document::new().with("name", "a").with("age", 30), &[])
        .unwrap();
    store
        .add(Document::new().with("name", "b").with("age", 30), &[])
        .unwrap();
    store
        .add(Document::new().with("name", "a").with("age", 40), &[])
        .unwrap();

    let by_age = store
        .query("age", &Comparison::Eq, &Value::Integer(30))
        .unwrap();
    let by_name = store
        .query("name", &Comparison::Eq, &Value::from("a"))
        .unwrap();

    let both: Vec<DocumentId> = by_age.intersection(&by_name).copied().collect();
    let docs = store.access(&both);

    assert_eq!(both, vec![id1]);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].get("age"), Some(&Value::Integer(30)));
}
