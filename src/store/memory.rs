use super::record::TranscriptionRecord;
use super::{validate_put, validate_token, HandoffStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory backend: a single map behind a `tokio::sync::RwLock`.
///
/// `take` and `sweep` go through the write lock, so removal-on-read is
/// atomic for free; a record removed by one caller is gone before any
/// other caller can look. Data does not survive a process restart.
pub struct MemoryStore {
    records: RwLock<HashMap<String, TranscriptionRecord>>,
    ttl: chrono::Duration,
}

impl MemoryStore {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Number of records currently held, live or not yet swept.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl HandoffStore for MemoryStore {
    async fn put(&self, token: &str, text: &str) -> Result<(), StoreError> {
        validate_put(token, text)?;

        let mut records = self.records.write().await;
        records.insert(token.to_string(), TranscriptionRecord::new(text));
        Ok(())
    }

    async fn take(&self, token: &str) -> Result<Option<TranscriptionRecord>, StoreError> {
        validate_token(token)?;

        let mut records = self.records.write().await;
        match records.remove(token) {
            Some(record) if !record.is_expired(Utc::now(), self.ttl) => Ok(Some(record)),
            // An expired record was already removed above; report it
            // exactly like a token that was never written.
            _ => Ok(None),
        }
    }

    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        let ttl = self.ttl;
        records.retain(|_, record| !record.is_expired(now, ttl));
        Ok(before - records.len())
    }
}
