use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::audio::CaptureConfig;

/// Configuration for recording sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Duration of each audio chunk before it is handed off for
    /// transcription. Default: 5 seconds.
    pub chunk_interval: Duration,

    /// Sample rate for audio processing (Whisper expects 16kHz)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono)
    pub channels: u16,

    /// Request echo cancellation from the capture backend
    pub echo_cancellation: bool,

    /// Request noise suppression from the capture backend
    pub noise_suppression: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chunk_interval: Duration::from_millis(5000),
            sample_rate: 16000, // Whisper expects 16kHz
            channels: 1,        // Mono
            echo_cancellation: true,
            noise_suppression: true,
        }
    }
}

impl SessionConfig {
    /// The constraints handed to the capture backend
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            target_sample_rate: self.sample_rate,
            target_channels: self.channels,
            buffer_duration_ms: 100, // 100ms latency
            echo_cancellation: self.echo_cancellation,
            noise_suppression: self.noise_suppression,
        }
    }
}
