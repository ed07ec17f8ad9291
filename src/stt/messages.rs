use serde::{Deserialize, Serialize};

/// Transcription request sent to the STT service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeRequest {
    pub session_id: String,
    pub chunk_index: u32,
    pub audio: String, // Base64-encoded WAV payload
    pub sample_rate: u32,
    pub channels: u16,
    pub timestamp: String, // RFC3339 timestamp
}

/// Raw reply from the STT service
///
/// Success carries `text` (plus optional `segments`); failure carries `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeReply {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub segments: Vec<ReplySegment>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Per-segment timing detail, passed through but unused by the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplySegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// A successful transcription result
///
/// `text` may still be empty or whitespace-only, which the session controller
/// treats as silence.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub text: String,
    pub segments: Vec<ReplySegment>,
}
