use super::record::TranscriptionRecord;
use super::{validate_put, validate_token, HandoffStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;

/// File-backed backend: one JSON file per session token under a data
/// directory. Survives a process restart, at the cost of a syscall per
/// operation; fine for a polling relay.
///
/// Tokens are opaque strings with no enforced format, so the filename
/// is the hex encoding of the token bytes; a token containing `/` or
/// `..` cannot address anything outside the data directory.
pub struct FileStore {
    data_dir: PathBuf,
    ttl: chrono::Duration,
    // put is write-then-rename, take and sweep are read-then-delete;
    // serializing all three keeps removal-on-read atomic and stops a
    // rename landing between another caller's read and delete, same
    // guarantee the memory backend gets from its write lock.
    op_lock: Mutex<()>,
}

impl FileStore {
    pub async fn new(data_dir: impl AsRef<Path>, ttl: std::time::Duration) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| StoreError::Unavailable(format!("cannot create data dir: {}", e)))?;

        Ok(Self {
            data_dir,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            op_lock: Mutex::new(()),
        })
    }

    fn record_path(&self, token: &str) -> PathBuf {
        let name: String = token.bytes().map(|b| format!("{:02x}", b)).collect();
        self.data_dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl HandoffStore for FileStore {
    async fn put(&self, token: &str, text: &str) -> Result<(), StoreError> {
        validate_put(token, text)?;

        let record = TranscriptionRecord::new(text);
        let bytes = serde_json::to_vec(&record)
            .map_err(|e| StoreError::Internal(format!("cannot encode record: {}", e)))?;

        let _guard = self.op_lock.lock().await;

        // Write-then-rename so a crashed write never leaves a half
        // written record behind.
        let path = self.record_path(token);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::Unavailable(format!("cannot write record: {}", e)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Unavailable(format!("cannot write record: {}", e)))?;
        Ok(())
    }

    async fn take(&self, token: &str) -> Result<Option<TranscriptionRecord>, StoreError> {
        validate_token(token)?;

        let _guard = self.op_lock.lock().await;

        let path = self.record_path(token);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Unavailable(format!("cannot read record: {}", e))),
        };

        // One-time fetch: the file is gone before the record is handed
        // out, so a retried poll cannot observe it again.
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| StoreError::Unavailable(format!("cannot remove record: {}", e)))?;

        let record: TranscriptionRecord = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Internal(format!("corrupt record for session: {}", e)))?;

        if record.is_expired(Utc::now(), self.ttl) {
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let _guard = self.op_lock.lock().await;

        let mut dir = tokio::fs::read_dir(&self.data_dir)
            .await
            .map_err(|e| StoreError::Unavailable(format!("cannot read data dir: {}", e)))?;

        let mut removed = 0;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StoreError::Unavailable(format!("cannot read data dir: {}", e)))?
        {
            let path = entry.path();
            if path.extension().map(|ext| ext != "json").unwrap_or(true) {
                continue;
            }

            let record: TranscriptionRecord = match tokio::fs::read(&path).await {
                Ok(bytes) => match serde_json::from_slice(&bytes) {
                    Ok(record) => record,
                    Err(e) => {
                        warn!("Skipping unreadable record {}: {}", path.display(), e);
                        continue;
                    }
                },
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    warn!("Skipping unreadable record {}: {}", path.display(), e);
                    continue;
                }
            };

            if record.is_expired(now, self.ttl) {
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    if e.kind() != ErrorKind::NotFound {
                        warn!("Failed to remove expired record {}: {}", path.display(), e);
                        continue;
                    }
                }
                removed += 1;
            }
        }

        Ok(removed)
    }
}
