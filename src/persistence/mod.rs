//! Persistence layer: one JSON document under a fixed storage key.
//!
//! The whole [`VehicleRecord`] is written on every mutation (no deltas, no
//! schema versions). [`RecordStorage`] abstracts where the document lives;
//! [`FileStorage`] keeps it on the local filesystem and [`InMemoryStorage`]
//! keeps it in process memory.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::domain::VehicleRecord;
use crate::error::TrackerError;

pub use file::FileStorage;
pub use memory::InMemoryStorage;

/// Storage backend holding the persisted record document.
#[async_trait]
pub trait RecordStorage: Send + Sync + std::fmt::Debug {
    /// Storage key the document lives under.
    fn key(&self) -> &str;

    /// Loads the persisted record.
    ///
    /// Returns `Ok(None)` when nothing is stored or the stored document
    /// cannot be parsed; the parse failure is logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] if an existing document cannot
    /// be read.
    async fn load(&self) -> Result<Option<VehicleRecord>, TrackerError>;

    /// Replaces the persisted document with `record`, provided the stored
    /// revision still equals `expected_revision`.
    ///
    /// A missing document counts as revision 0. A document that does not
    /// decode as a full record does not block the write.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::RevisionConflict`] when another writer got
    /// there first, or a storage/serialization error on failure.
    async fn save(&self, record: &VehicleRecord, expected_revision: u64)
    -> Result<(), TrackerError>;
}

/// Parses a stored document, logging and discarding it when malformed.
pub(crate) fn decode_record(key: &str, raw: &str) -> Option<VehicleRecord> {
    match serde_json::from_str::<VehicleRecord>(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to parse stored record, using defaults");
            None
        }
    }
}

/// Fails with [`TrackerError::RevisionConflict`] if the stored document
/// has moved past `expected`.
///
/// Only a document that decodes as a whole [`VehicleRecord`] is checked.
/// Anything else loads as the default aggregate, so it must stay writable.
pub(crate) fn check_revision(stored: Option<&str>, expected: u64) -> Result<(), TrackerError> {
    let found = match stored {
        None => 0,
        Some(raw) => match serde_json::from_str::<VehicleRecord>(raw) {
            Ok(record) => record.revision,
            Err(_) => return Ok(()),
        },
    };
    if found == expected {
        Ok(())
    } else {
        Err(TrackerError::RevisionConflict { expected, found })
    }
}

/// Encodes the record as the stored JSON document.
pub(crate) fn encode_record(record: &VehicleRecord) -> Result<String, TrackerError> {
    Ok(serde_json::to_string(record)?)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    fn stored_at(revision: u64) -> String {
        let mut record = VehicleRecord::default();
        for _ in 0..revision {
            record = record.next_revision();
        }
        let Ok(raw) = encode_record(&record) else {
            panic!("record should encode");
        };
        raw
    }

    #[test]
    fn garbage_decodes_to_none() {
        assert!(decode_record("k", "{not json").is_none());
        assert!(decode_record("k", r#"{"currentKm":"abc"}"#).is_none());
    }

    #[test]
    fn revision_check_counts_missing_documents_as_zero() {
        assert_ok!(check_revision(None, 0));
        let err = assert_err!(check_revision(None, 3));
        assert!(matches!(
            err,
            TrackerError::RevisionConflict {
                expected: 3,
                found: 0
            }
        ));
    }

    #[test]
    fn revision_check_reads_stored_revision() {
        assert_ok!(check_revision(Some(&stored_at(4)), 4));
        assert_ok!(check_revision(Some(&stored_at(0)), 0));
        assert_err!(check_revision(Some(&stored_at(5)), 4));
    }

    #[test]
    fn unparsable_documents_do_not_block_writes() {
        assert_ok!(check_revision(Some("][ corrupted"), 9));
    }

    #[test]
    fn malformed_record_with_a_revision_does_not_block_writes() {
        let raw = r#"{"currentKm":10,"lastOilChangeKm":0,
            "refuels":[{"id":"a","date":"2024/01/01","km":1,"liters":1,"value":1,"isFull":true}],
            "oilChanges":[],"oilChangeInterval":5000,"revision":3}"#;
        assert!(decode_record("k", raw).is_none());
        assert_ok!(check_revision(Some(raw), 0));
    }
}
