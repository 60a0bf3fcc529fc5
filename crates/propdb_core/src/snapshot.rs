//! Snapshot persistence for the store.
//!
//! ## Format
//!
//! One opaque versioned blob:
//!
//! ```text
//! SnapshotBlob {
//!     magic: [0x50, 0x44, 0x42, 0x53]   // "PDBS"
//!     version: u16 (little-endian)      // currently 1
//!     payload: CBOR { table, index }
//! }
//! ```
//!
//! ## Invariants
//!
//! - `decode` rejects unknown magic/version and payloads missing either
//!   structure, so incompatible blobs fail loudly instead of corrupting state
//! - a decoded index must reference only documents present in the decoded
//!   table; the live store is never touched on a failed load

use crate::error::{CoreError, CoreResult};
use crate::index::{IndexEntries, PropertyIndex};
use crate::table::DocumentTable;
use serde::{Deserialize, Serialize};

/// Magic bytes for snapshot blobs: "PDBS".
const SNAPSHOT_MAGIC: [u8; 4] = *b"PDBS";

/// Current snapshot format version.
const SNAPSHOT_VERSION: u16 = 1;

/// Header length: magic plus version.
const HEADER_LEN: usize = 6;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    table: &'a DocumentTable,
    index: &'a IndexEntries,
}

#[derive(Deserialize)]
struct Snapshot {
    table: DocumentTable,
    index: IndexEntries,
}

/// Serializes the document table and property index into one blob.
pub(crate) fn encode(table: &DocumentTable, index: &PropertyIndex) -> CoreResult<Vec<u8>> {
    let payload = propdb_codec::encode(&SnapshotRef {
        table,
        index: index.entries(),
    })?;

    let mut blob = Vec::with_capacity(HEADER_LEN + payload.len());
    blob.extend_from_slice(&SNAPSHOT_MAGIC);
    blob.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    blob.extend_from_slice(&payload);
    Ok(blob)
}

/// Deserializes a blob back into a table and index pair.
///
/// # Errors
///
/// Returns [`CoreError::InvalidFormat`] if the header is unrecognized, the
/// payload does not hold the two expected structures, or the index
/// references a document missing from the table.
pub(crate) fn decode(blob: &[u8]) -> CoreResult<(DocumentTable, PropertyIndex)> {
    if blob.len() < HEADER_LEN {
        return Err(CoreError::invalid_format("snapshot blob too small"));
    }
    if blob[0..4] != SNAPSHOT_MAGIC {
        return Err(CoreError::invalid_format("bad snapshot magic"));
    }

    let version = u16::from_le_bytes([blob[4], blob[5]]);
    if version != SNAPSHOT_VERSION {
        return Err(CoreError::invalid_format(format!(
            "unsupported snapshot version {version}"
        )));
    }

    let snapshot: Snapshot = propdb_codec::decode(&blob[HEADER_LEN..])
        .map_err(|e| CoreError::invalid_format(format!("snapshot payload: {e}")))?;

    for (prop, values) in &snapshot.index {
        for ids in values.values() {
            for id in ids {
                if !snapshot.table.contains(id) {
                    return Err(CoreError::invalid_format(format!(
                        "index entry for property {prop:?} references unknown document {id}"
                    )));
                }
            }
        }
    }

    Ok((snapshot.table, PropertyIndex::from_entries(snapshot.index)))
}
