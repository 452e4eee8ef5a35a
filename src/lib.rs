pub mod config;
pub mod http;
pub mod store;

pub use config::{Config, StoreBackend};
pub use http::{create_router, AppState};
pub use store::{
    FileStore, HandoffStore, MemoryStore, StoreError, Sweeper, TranscriptionRecord,
};
