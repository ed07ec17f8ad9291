use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use base64::Engine;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::audio::AudioChunk;
use crate::capture::{CaptureState, ChunkConsumer, StateCell};
use crate::stt::{TranscribeClient, TranscribeError, TranscribeRequest, Transcription};

/// Outcome of one chunk's transcription round trip
#[derive(Debug)]
pub struct TranscribeOutcome {
    pub chunk_index: usize,
    pub result: Result<Transcription, TranscribeError>,
}

/// Decides, per emitted chunk, whether to forward it for transcription.
///
/// The session state is read here, at dispatch time, not at chunk creation:
/// a pause landing mid-interval still suppresses the chunk. Forwarded chunks
/// are serialized (base64 WAV in a JSON envelope) and the client call runs on
/// a detached task, so the capture pump never waits on transcription and any
/// number of requests may be in flight at once.
pub struct ChunkDispatcher {
    session_id: String,
    client: Arc<dyn TranscribeClient>,
    state: Arc<StateCell>,
    forwarded: Arc<AtomicUsize>,
    outcome_tx: mpsc::Sender<TranscribeOutcome>,
}

impl ChunkDispatcher {
    pub fn new(
        session_id: String,
        client: Arc<dyn TranscribeClient>,
        state: Arc<StateCell>,
        forwarded: Arc<AtomicUsize>,
        outcome_tx: mpsc::Sender<TranscribeOutcome>,
    ) -> Self {
        Self {
            session_id,
            client,
            state,
            forwarded,
            outcome_tx,
        }
    }

    /// Forward `chunk` for transcription, or drop it silently if the session
    /// is paused right now.
    pub fn dispatch(&self, chunk: AudioChunk) {
        if self.state.get() == CaptureState::Paused {
            debug!(chunk = chunk.index, "Dropping chunk emitted while paused");
            return;
        }

        let request = TranscribeRequest {
            session_id: self.session_id.clone(),
            chunk_index: chunk.index as u32,
            audio: base64::engine::general_purpose::STANDARD.encode(&chunk.data),
            sample_rate: chunk.sample_rate,
            channels: chunk.channels,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        debug!(
            chunk = chunk.index,
            bytes = chunk.data.len(),
            "Forwarding chunk for transcription"
        );

        self.forwarded.fetch_add(1, Ordering::SeqCst);

        let client = Arc::clone(&self.client);
        let outcome_tx = self.outcome_tx.clone();
        let chunk_index = chunk.index;

        // Fire-and-forget relative to the capture session
        tokio::spawn(async move {
            let result = client.transcribe(request).await;

            if let Err(e) = &result {
                error!(chunk = chunk_index, "Transcription failed: {}", e);
            }

            if outcome_tx
                .send(TranscribeOutcome {
                    chunk_index,
                    result,
                })
                .await
                .is_err()
            {
                debug!(chunk = chunk_index, "Outcome receiver gone, result discarded");
            }
        });
    }
}

impl ChunkConsumer for ChunkDispatcher {
    fn accept(&self, chunk: AudioChunk) {
        self.dispatch(chunk);
    }
}
