pub mod client;
pub mod messages;

pub use client::{NatsTranscribeClient, TranscribeClient, TranscribeError};
pub use messages::{ReplySegment, TranscribeReply, TranscribeRequest, Transcription};
