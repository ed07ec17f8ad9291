use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capture::CaptureState;

/// Statistics about the recording session, as served by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Current capture state
    pub state: CaptureState,

    /// Active session id, if any
    pub session_id: Option<String>,

    /// When the active session started
    pub started_at: Option<DateTime<Utc>>,

    /// Session duration in seconds
    pub duration_secs: f64,

    /// Number of chunks forwarded for transcription so far
    pub chunks_dispatched: usize,

    /// Number of transcript entries appended so far
    pub transcript_entries: usize,

    /// The single user-visible error, if one is active
    pub last_error: Option<String>,
}
