use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A transcription waiting to be picked up by the plugin poller.
///
/// Owned exclusively by the store once written; the file backend
/// persists it verbatim as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionRecord {
    /// Transcribed text from the capture page
    pub text: String,

    /// When the capture page handed the text off
    pub created_at: DateTime<Utc>,
}

impl TranscriptionRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether this record has outlived `ttl` as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }

    /// Creation time as epoch milliseconds, the representation the
    /// capture page and the plugin exchange on the wire.
    pub fn timestamp_ms(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}
