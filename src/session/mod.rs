//! Session orchestration
//!
//! This module binds the pieces of the pipeline together:
//! - `SessionController` maps user intents to capture transitions, owns the
//!   single active session, and routes transcription outcomes
//! - `SessionConfig` carries timing and format settings
//! - `SessionStats` is the snapshot served by the status endpoint

mod config;
mod controller;
mod stats;

pub use config::SessionConfig;
pub use controller::{ErrorSlot, SessionController};
pub use stats::SessionStats;
