use crate::store::HandoffStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The hand-off store; backend chosen at startup
    pub store: Arc<dyn HandoffStore>,

    /// Service name reported by the health endpoint
    pub service_name: String,

    /// When the server came up
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<dyn HandoffStore>, service_name: String) -> Self {
        Self {
            store,
            service_name,
            started_at: Utc::now(),
        }
    }
}
