//! Session-keyed hand-off store
//!
//! The store is a single-use mailbox: the capture page writes a
//! transcription under an opaque session token, the plugin poller reads
//! it back exactly once. Records that are never read expire after a TTL
//! and are removed by a periodic sweep.
//!
//! Per token the lifecycle is:
//! NONE -> PENDING (put) -> CONSUMED (take) or EXPIRED (ttl) -> NONE.
//! Only a new `put` re-enters PENDING.

mod file;
mod memory;
mod record;
mod sweeper;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::TranscriptionRecord;
pub use sweeper::Sweeper;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors a store backend can report. Endpoints map these 1:1 onto
/// HTTP status classes and never swallow them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing or empty token/text. The store is not touched.
    #[error("{0}")]
    InvalidArgument(&'static str),

    /// Backing medium unreachable (file backend I/O failure).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Unexpected failure, e.g. a corrupt on-disk record.
    #[error("internal store error: {0}")]
    Internal(String),
}

/// Contract shared by every backend. Backend choice is a deployment
/// concern; the put/take/sweep semantics are identical.
#[async_trait]
pub trait HandoffStore: Send + Sync {
    /// Stores `text` under `token` with the current time, replacing any
    /// existing record for that token.
    async fn put(&self, token: &str, text: &str) -> Result<(), StoreError>;

    /// Removes and returns the live record under `token`, if any.
    ///
    /// Returns `Ok(None)` for a token that was never written, already
    /// consumed, or whose record has outlived the TTL. Expired records
    /// found here are removed on the spot (lazy expiry) and reported
    /// exactly like ones that never existed. Removal is atomic with
    /// respect to concurrent `take`/`sweep` calls: no two callers ever
    /// observe the same record.
    async fn take(&self, token: &str) -> Result<Option<TranscriptionRecord>, StoreError>;

    /// Removes every record older than the TTL as of `now` and returns
    /// the number removed. Idempotent; safe concurrently with
    /// `put`/`take`.
    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;
}

fn validate_token(token: &str) -> Result<(), StoreError> {
    if token.is_empty() {
        return Err(StoreError::InvalidArgument("Session token is required"));
    }
    Ok(())
}

fn validate_put(token: &str, text: &str) -> Result<(), StoreError> {
    validate_token(token)?;
    if text.is_empty() {
        return Err(StoreError::InvalidArgument("Transcription text is required"));
    }
    Ok(())
}
