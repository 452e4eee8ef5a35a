use super::state::AppState;
use crate::store::StoreError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTranscriptionRequest {
    /// Opaque session token generated by the capture page's caller
    #[serde(default)]
    pub session_token: String,

    /// Transcribed text to hand off
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SaveTranscriptionResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct GetTranscriptionParams {
    #[serde(default)]
    pub session: String,
}

#[derive(Debug, Serialize)]
pub struct GetTranscriptionResponse {
    pub text: String,

    /// Creation time as epoch milliseconds
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub uptime_secs: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /save-transcription
/// Capture page hands off transcribed text for a session
pub async fn save_transcription(
    State(state): State<AppState>,
    Json(req): Json<SaveTranscriptionRequest>,
) -> impl IntoResponse {
    match state.store.put(&req.session_token, &req.text).await {
        Ok(()) => {
            info!("Transcription saved for session: {}", req.session_token);
            (StatusCode::OK, Json(SaveTranscriptionResponse { success: true })).into_response()
        }
        Err(e) => store_error_response(e),
    }
}

/// GET /get-transcription?session=<token>
/// Plugin polls for a hand-off; a hit consumes the record
pub async fn get_transcription(
    State(state): State<AppState>,
    Query(params): Query<GetTranscriptionParams>,
) -> impl IntoResponse {
    match state.store.take(&params.session).await {
        Ok(Some(record)) => {
            info!("Transcription delivered for session: {}", params.session);
            let timestamp = record.timestamp_ms();
            (
                StatusCode::OK,
                Json(GetTranscriptionResponse {
                    text: record.text,
                    timestamp,
                }),
            )
                .into_response()
        }
        // Expected while the capture page is still recording; the
        // poller keeps waiting on 404.
        Ok(None) => {
            debug!("No transcription yet for session: {}", params.session);
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "No transcription found for this session".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => store_error_response(e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime_secs = (chrono::Utc::now() - state.started_at).num_seconds();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            service: state.service_name.clone(),
            uptime_secs,
        }),
    )
        .into_response()
}

/// Maps store errors 1:1 onto HTTP status classes. Internal failures
/// are logged in full but reported generically to the caller.
fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::InvalidArgument(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: msg.to_string(),
            }),
        )
            .into_response(),
        StoreError::Unavailable(msg) => {
            error!("Store unavailable: {}", msg);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "Transcription store is unavailable".to_string(),
                }),
            )
                .into_response()
        }
        StoreError::Internal(msg) => {
            error!("Store error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}
