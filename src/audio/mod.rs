pub mod capture;
pub mod encoder;
pub mod file;
pub mod mic;

pub use capture::{AudioCapture, AudioFrame, CaptureConfig, CaptureError, CaptureProvider};
pub use encoder::{AudioChunk, SegmentEncoder};
pub use file::{WavFileCapture, WavFileProvider};
pub use mic::{MicrophoneCapture, MicrophoneProvider};
