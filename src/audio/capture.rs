use thiserror::Error;
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Constraints requested when opening a capture backend
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target sample rate (frames are downsampled to this if needed)
    pub target_sample_rate: u32,
    /// Target channel count (1 = mono)
    pub target_channels: u16,
    /// Buffer size in milliseconds (affects latency)
    pub buffer_duration_ms: u64,
    /// Request echo cancellation from the platform audio stack
    pub echo_cancellation: bool,
    /// Request noise suppression from the platform audio stack
    pub noise_suppression: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000, // 16kHz for Whisper
            target_channels: 1,        // Mono
            buffer_duration_ms: 100,   // 100ms buffers
            echo_cancellation: true,
            noise_suppression: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Microphone access denied")]
    PermissionDenied,

    #[error("No input device available")]
    NoInputDevice,

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio backend error: {0}")]
    Backend(String),
}

/// Audio capture backend trait
///
/// Implementations:
/// - `MicrophoneCapture`: live microphone via cpal (all platforms)
/// - `WavFileCapture`: streams a WAV file (demos, batch tests)
#[async_trait::async_trait]
pub trait AudioCapture: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames. On failure
    /// no capture resources remain allocated.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError>;

    /// Stop capturing audio and release the underlying device
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Seam for opening capture backends.
///
/// The session controller holds a provider rather than a concrete backend so
/// the microphone can be swapped for a file source or a scripted fake.
pub trait CaptureProvider: Send + Sync {
    fn open(&self, config: &CaptureConfig) -> Result<Box<dyn AudioCapture>, CaptureError>;
}
