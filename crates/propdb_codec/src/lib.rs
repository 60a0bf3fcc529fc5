//! # PropDB Codec
//!
//! Dynamic value model and snapshot encoding for PropDB.
//!
//! This crate provides:
//! - [`Value`], the dynamic property value type stored in documents
//! - CBOR encoding/decoding of serde-serializable snapshot structures
//!
//! Floats are intentionally not part of the value model: every value must
//! admit equality and hashing so it can serve as an inverted-index key.
//!
//! ## Usage
//!
//! ```
//! use propdb_codec::{decode, encode, Value};
//!
//! let value = Value::Integer(42);
//! let bytes = encode(&value).unwrap();
//! let decoded: Value = decode(&bytes).unwrap();
//! assert_eq!(value, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod value;

pub use error::{CodecError, CodecResult};
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes a serializable structure to CBOR bytes.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if the value cannot be
/// represented in CBOR.
pub fn encode<T: Serialize>(value: &T) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf)
        .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    Ok(buf)
}

/// Decodes a structure from CBOR bytes.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] if the bytes are not valid CBOR
/// or do not match the expected structure.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    ciborium::de::from_reader(bytes).map_err(|e| CodecError::decoding_failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn scalar_roundtrip() {
        for value in [
            Value::Null,
            Value::Bool(true),
            Value::Integer(-7),
            Value::Text("hello".into()),
            Value::Bytes(vec![1, 2, 3]),
        ] {
            let bytes = encode(&value).unwrap();
            let decoded: Value = decode(&bytes).unwrap();
            assert_eq!(value, decoded);
        }
    }

    #[test]
    fn nested_roundtrip() {
        let mut map = BTreeMap::new();
        map.insert("tags".to_string(), Value::from(vec!["a", "b"]));
        map.insert("count".to_string(), Value::Integer(2));
        let value = Value::Map(map);

        let bytes = encode(&value).unwrap();
        let decoded: Value = decode(&bytes).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn decode_garbage_fails() {
        let result: CodecResult<Value> = decode(&[0xff, 0x00, 0x13, 0x37]);
        assert!(result.is_err());
    }

    #[test]
    fn decode_wrong_shape_fails() {
        let bytes = encode(&Value::Integer(1)).unwrap();
        let result: CodecResult<Vec<String>> = decode(&bytes);
        assert!(result.is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn integer_roundtrip(n in any::<i64>()) {
                let value = Value::Integer(n);
                let decoded: Value = decode(&encode(&value).unwrap()).unwrap();
                prop_assert_eq!(value, decoded);
            }

            #[test]
            fn text_roundtrip(s in ".*") {
                let value = Value::Text(s);
                let decoded: Value = decode(&encode(&value).unwrap()).unwrap();
                prop_assert_eq!(value, decoded);
            }

            #[test]
            fn bytes_roundtrip(b in prop::collection::vec(any::<u8>(), 0..64)) {
                let value = Value::Bytes(b);
                let decoded: Value = decode(&encode(&value).unwrap()).unwrap();
                prop_assert_eq!(value, decoded);
            }

            #[test]
            fn decode_arbitrary_bytes_never_panics(data in prop::collection::vec(any::<u8>(), 0..64)) {
                let _: CodecResult<Value> = decode(&data);
            }
        }
    }
}
