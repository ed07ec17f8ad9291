//! HTTP API for external control of the recording session
//!
//! This module provides the REST surface driving the pipeline:
//! - POST /session/start - Start a new recording session
//! - POST /session/pause - Pause the active session
//! - POST /session/resume - Resume a paused session
//! - POST /session/stop - Stop and flush the active session
//! - GET /session/status - Query session state and counters
//! - GET /session/transcript - Get the accumulated transcript
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
