//! Property-based test generators using proptest.
//!
//! Strategies deliberately draw from small pools of names and values so
//! generated document sets collide on indexed values, which is where the
//! inverted index actually has work to do.

use propdb_core::{Document, DocumentId, Value};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Pool of indexed property names.
const PROPERTY_NAMES: &[&str] = &["name", "age", "tag", "flag", "note"];

/// Pool of property names used for excluded, composite-valued properties.
const EXCLUDED_NAMES: &[&str] = &["blob", "meta"];

/// Strategy for generating document IDs.
pub fn document_id_strategy() -> impl Strategy<Value = DocumentId> {
    prop::array::uniform16(any::<u8>()).prop_map(DocumentId::from_bytes)
}

/// Strategy for generating indexable (scalar) values.
pub fn indexable_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-5i64..5).prop_map(Value::Integer),
        prop::string::string_regex("[a-c]{1,2}")
            .expect("Invalid regex")
            .prop_map(Value::Text),
        prop::collection::vec(0u8..4, 0..3).prop_map(Value::Bytes),
    ]
}

/// Strategy for generating composite (non-indexable) values.
pub fn composite_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::collection::vec(indexable_value_strategy(), 0..4).prop_map(Value::Array),
        prop::collection::btree_map(
            prop::string::string_regex("[x-z]{1,2}").expect("Invalid regex"),
            indexable_value_strategy(),
            0..4
        )
        .prop_map(Value::Map),
    ]
}

/// Strategy for generating an indexed property name.
pub fn property_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(PROPERTY_NAMES.to_vec()).prop_map(str::to_string)
}

/// Strategy for generating fully indexable documents.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::btree_map(property_name_strategy(), indexable_value_strategy(), 0..5)
        .prop_map(Document::from)
}

/// Strategy for generating a document together with its exclusion list.
///
/// The excluded properties carry composite values, so adding the document
/// without the exclusions would fail validation.
pub fn document_with_exclusions_strategy() -> impl Strategy<Value = (Document, Vec<String>)> {
    (
        document_strategy(),
        prop::collection::btree_map(
            prop::sample::select(EXCLUDED_NAMES.to_vec()).prop_map(str::to_string),
            composite_value_strategy(),
            0..2,
        ),
    )
        .prop_map(|(doc, excluded)| {
            let names: Vec<String> = excluded.keys().cloned().collect();
            let mut map: BTreeMap<String, Value> = doc.iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            map.extend(excluded);
            (Document::from(map), names)
        })
}

/// Strategy for generating a batch of documents.
pub fn document_batch_strategy(max: usize) -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(document_strategy(), 0..max)
}
