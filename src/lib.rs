pub mod audio;
pub mod capture;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod session;
pub mod stt;
pub mod transcript;

pub use audio::{
    AudioCapture, AudioChunk, AudioFrame, CaptureConfig, CaptureError, CaptureProvider,
    MicrophoneProvider, SegmentEncoder, WavFileProvider,
};
pub use capture::{CaptureSession, CaptureState, ChunkConsumer, StateCell};
pub use config::Config;
pub use dispatch::{ChunkDispatcher, TranscribeOutcome};
pub use http::{create_router, AppState};
pub use session::{SessionConfig, SessionController, SessionStats};
pub use stt::{
    NatsTranscribeClient, TranscribeClient, TranscribeError, TranscribeReply, TranscribeRequest,
    Transcription,
};
pub use transcript::{TranscriptEntry, TranscriptStore};
