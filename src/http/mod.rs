//! HTTP API bridging the browser capture page and the plugin poller
//!
//! - POST /save-transcription - capture page hands off transcribed text
//! - GET /get-transcription?session=<token> - plugin polls for it (one-shot read)
//! - GET /health - health check
//!
//! The capture page posts from a browser origin the server cannot know
//! in advance, so the router carries a permissive CORS layer.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
