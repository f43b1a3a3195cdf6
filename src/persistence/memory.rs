//! In-memory record storage for tests and throwaway sessions.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{RecordStorage, check_revision, decode_record, encode_record};
use crate::domain::VehicleRecord;
use crate::error::TrackerError;

/// Record storage holding the encoded document in memory.
///
/// Clones share the same document, which makes it easy to put two stores
/// on one "device" in tests.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    key: String,
    document: Arc<Mutex<Option<String>>>,
}

impl InMemoryStorage {
    /// Creates empty storage under `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            document: Arc::new(Mutex::new(None)),
        }
    }

    /// Creates storage pre-filled with a raw document.
    #[must_use]
    pub fn with_raw(key: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            document: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// Returns the raw stored document, if any.
    pub async fn raw(&self) -> Option<String> {
        self.document.lock().await.clone()
    }
}

#[async_trait]
impl RecordStorage for InMemoryStorage {
    fn key(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> Result<Option<VehicleRecord>, TrackerError> {
        let document = self.document.lock().await;
        Ok(document.as_deref().and_then(|raw| decode_record(&self.key, raw)))
    }

    async fn save(
        &self,
        record: &VehicleRecord,
        expected_revision: u64,
    ) -> Result<(), TrackerError> {
        let mut document = self.document.lock().await;
        check_revision(document.as_deref(), expected_revision)?;
        *document = Some(encode_record(record)?);
        Ok(())
    }
}
