//! Ordered, append-only transcript of recognized utterances.

mod store;

pub use store::{speaker_label, TranscriptEntry, TranscriptStore};
