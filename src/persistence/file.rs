//! Filesystem-backed record storage.
//!
//! The document for key `k` lives at `<dir>/k.json`. Writes go to
//! `<dir>/k.json.tmp` first, are synced, then renamed over the real file,
//! so a crash leaves either the old or the new document on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{RecordStorage, check_revision, decode_record, encode_record};
use crate::domain::VehicleRecord;
use crate::error::TrackerError;

/// Record storage in a local directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    key: String,
    path: PathBuf,
    temp_path: PathBuf,
}

impl FileStorage {
    /// Creates storage for `key` inside `dir`. Nothing is touched on disk
    /// until the first save.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>, key: impl Into<String>) -> Self {
        let key = key.into();
        let dir = dir.as_ref();
        Self {
            path: dir.join(format!("{key}.json")),
            temp_path: dir.join(format!("{key}.json.tmp")),
            key,
        }
    }

    /// Path of the persisted document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_existing(&self) -> Result<Option<String>, TrackerError> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TrackerError::Storage(format!(
                "reading {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn write_atomically(&self, content: &str) -> Result<(), TrackerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let result = self.write_and_swap(content).await;
        if result.is_err() {
            // leave no half-written temp file behind
            match fs::remove_file(&self.temp_path).await {
                Err(e) if e.kind() != ErrorKind::NotFound => tracing::warn!(
                    path = %self.temp_path.display(),
                    error = %e,
                    "failed to remove temp file"
                ),
                _ => {}
            }
        }
        result
    }

    async fn write_and_swap(&self, content: &str) -> Result<(), TrackerError> {
        let mut file = fs::File::create(&self.temp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&self.temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStorage for FileStorage {
    fn key(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> Result<Option<VehicleRecord>, TrackerError> {
        let Some(raw) = self.read_existing().await? else {
            tracing::debug!(path = %self.path.display(), "no stored record");
            return Ok(None);
        };
        Ok(decode_record(&self.key, &raw))
    }

    async fn save(
        &self,
        record: &VehicleRecord,
        expected_revision: u64,
    ) -> Result<(), TrackerError> {
        let existing = self.read_existing().await?;
        check_revision(existing.as_deref(), expected_revision)?;

        let content = encode_record(record)?;
        self.write_atomically(&content).await?;
        tracing::debug!(
            path = %self.path.display(),
            revision = record.revision,
            bytes = content.len(),
            "record persisted"
        );
        Ok(())
    }
}
