use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// A single recognized utterance in the running transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Unique id, monotonically assigned across the process lifetime
    pub id: u64,

    /// Presentation label ("Speaker 1", "Speaker 2", ...)
    pub speaker: String,

    /// Recognized text
    pub text: String,

    /// When the entry was appended
    pub timestamp: DateTime<Utc>,

    /// Position in the session's sequence of entries (0-based)
    pub speaker_index: usize,
}

/// Append-only log of recognized utterances.
///
/// Entries are never mutated or removed during a session; the log is cleared
/// when a new recording session starts. Appends happen in arrival order of
/// transcription responses, which may differ from dispatch order.
#[derive(Clone, Default)]
pub struct TranscriptStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    entries: Vec<TranscriptEntry>,
    next_id: u64,
    created: usize,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recognized utterance.
    ///
    /// The speaker index equals the number of entries created so far this
    /// session; the label groups indices in pairs, so "Speaker 1" covers
    /// indices 0 and 1, "Speaker 2" covers 2 and 3, and so on.
    pub async fn append_utterance(&self, text: impl Into<String>) -> TranscriptEntry {
        let mut inner = self.inner.lock().await;

        let speaker_index = inner.created;
        let entry = TranscriptEntry {
            id: inner.next_id,
            speaker: speaker_label(speaker_index),
            text: text.into(),
            timestamp: Utc::now(),
            speaker_index,
        };

        inner.next_id += 1;
        inner.created += 1;
        inner.entries.push(entry.clone());

        entry
    }

    /// Drop all entries and restart speaker numbering for a new session.
    /// Entry ids keep counting up so they stay unique.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        inner.created = 0;
    }

    pub async fn entries(&self) -> Vec<TranscriptEntry> {
        self.inner.lock().await.entries.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Presentation label: two consecutive entries share a speaker number.
/// A labeling convenience, not diarization.
pub fn speaker_label(speaker_index: usize) -> String {
    format!("Speaker {}", speaker_index / 2 + 1)
}
