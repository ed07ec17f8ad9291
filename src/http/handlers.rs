use super::state::AppState;
use crate::capture::CaptureState;
use crate::session::SessionStats;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::error;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Option<String>,
    pub state: CaptureState,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub state: CaptureState,
    pub message: String,
    pub stats: SessionStats,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session/start
/// Start a new recording session (replacing any active one)
pub async fn start_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut controller = state.controller.lock().await;

    match controller.start().await {
        Ok(session_id) => (
            StatusCode::OK,
            Json(SessionResponse {
                session_id: Some(session_id),
                state: controller.state(),
                message: "Recording started".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start session: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("{:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /session/pause
/// Pause the active session (no-op unless recording)
pub async fn pause_session(State(state): State<AppState>) -> impl IntoResponse {
    let controller = state.controller.lock().await;
    controller.pause();

    (
        StatusCode::OK,
        Json(SessionResponse {
            session_id: controller.session_id(),
            state: controller.state(),
            message: "Pause requested".to_string(),
        }),
    )
}

/// POST /session/resume
/// Resume the active session (no-op unless paused)
pub async fn resume_session(State(state): State<AppState>) -> impl IntoResponse {
    let controller = state.controller.lock().await;
    controller.resume();

    (
        StatusCode::OK,
        Json(SessionResponse {
            session_id: controller.session_id(),
            state: controller.state(),
            message: "Resume requested".to_string(),
        }),
    )
}

/// POST /session/stop
/// Stop the active session, flushing the final partial chunk. Idempotent.
pub async fn stop_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut controller = state.controller.lock().await;
    controller.stop().await;

    let stats = controller.stats().await;

    (
        StatusCode::OK,
        Json(StopSessionResponse {
            state: controller.state(),
            message: "Recording stopped".to_string(),
            stats,
        }),
    )
}

/// GET /session/status
/// Snapshot of the session state, counters and the active error (if any)
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let controller = state.controller.lock().await;
    Json(controller.stats().await)
}

/// GET /session/transcript
/// The transcript accumulated so far, in append order
pub async fn get_transcript(State(state): State<AppState>) -> impl IntoResponse {
    let controller = state.controller.lock().await;
    Json(controller.transcript().await)
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
