use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::config::SessionConfig;
use super::stats::SessionStats;
use crate::audio::CaptureProvider;
use crate::capture::{CaptureSession, CaptureState, StateCell};
use crate::dispatch::{ChunkDispatcher, TranscribeOutcome};
use crate::stt::TranscribeClient;
use crate::transcript::{TranscriptEntry, TranscriptStore};

/// Shared slot for the single user-visible error message.
///
/// At most one error is visible at a time; it is cleared by the next
/// successful transcription or by a new recording start.
#[derive(Clone, Default)]
pub struct ErrorSlot {
    inner: Arc<std::sync::Mutex<Option<String>>>,
}

impl ErrorSlot {
    pub fn set(&self, message: impl Into<String>) {
        *self.inner.lock().expect("error slot poisoned") = Some(message.into());
    }

    pub fn clear(&self) {
        *self.inner.lock().expect("error slot poisoned") = None;
    }

    pub fn get(&self) -> Option<String> {
        self.inner.lock().expect("error slot poisoned").clone()
    }
}

struct ActiveSession {
    session_id: String,
    capture: CaptureSession,
    started_at: DateTime<Utc>,
    chunks_forwarded: Arc<AtomicUsize>,
}

/// Binds user intents (start/pause/resume/stop) to capture transitions and
/// routes transcription outcomes into the transcript store.
///
/// Holds at most one active session. Callers are expected to serialize
/// control operations (the HTTP layer does so with a mutex).
pub struct SessionController {
    config: SessionConfig,
    provider: Arc<dyn CaptureProvider>,
    client: Arc<dyn TranscribeClient>,
    transcript: TranscriptStore,
    last_error: ErrorSlot,
    active: Option<ActiveSession>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        provider: Arc<dyn CaptureProvider>,
        client: Arc<dyn TranscribeClient>,
    ) -> Self {
        Self {
            config,
            provider,
            client,
            transcript: TranscriptStore::new(),
            last_error: ErrorSlot::default(),
            active: None,
        }
    }

    /// Start a new recording session, tearing down any active one first.
    ///
    /// Clears the transcript, the error slot and the speaker numbering, then
    /// opens the capture backend. On failure the error slot is set, no
    /// session is left active, and the error is returned to the caller.
    pub async fn start(&mut self) -> Result<String> {
        if self.active.is_some() {
            info!("Start requested while a session is active, replacing it");
            self.stop().await;
        }

        self.transcript.reset().await;
        self.last_error.clear();

        let session_id = format!("session-{}", Uuid::new_v4());
        info!("Starting recording session: {}", session_id);

        let state = Arc::new(StateCell::new(CaptureState::Idle));
        let chunks_forwarded = Arc::new(AtomicUsize::new(0));
        let (outcome_tx, outcome_rx) = mpsc::channel(64);

        let dispatcher = ChunkDispatcher::new(
            session_id.clone(),
            Arc::clone(&self.client),
            Arc::clone(&state),
            Arc::clone(&chunks_forwarded),
            outcome_tx,
        );

        // Left running after stop so in-flight transcriptions still land;
        // it exits once the dispatcher and its request tasks are gone.
        tokio::spawn(consume_outcomes(
            outcome_rx,
            self.transcript.clone(),
            self.last_error.clone(),
        ));

        let capture_config = self.config.capture_config();

        let backend = self.provider.open(&capture_config).map_err(|e| {
            let message = format!("Could not access microphone: {}", e);
            error!("{}", message);
            self.last_error.set(&message);
            anyhow::Error::new(e).context("Failed to open capture backend")
        })?;

        let capture = CaptureSession::start(
            backend,
            capture_config,
            self.config.chunk_interval,
            Box::new(dispatcher),
            Arc::clone(&state),
        )
        .await
        .map_err(|e| {
            let message = format!("Could not access microphone: {}", e);
            error!("{}", message);
            self.last_error.set(&message);
            anyhow::Error::new(e).context("Failed to start capture")
        })?;

        self.active = Some(ActiveSession {
            session_id: session_id.clone(),
            capture,
            started_at: Utc::now(),
            chunks_forwarded,
        });

        info!("Recording session started: {}", session_id);

        Ok(session_id)
    }

    /// Pause the active session. No-op when nothing is recording.
    pub fn pause(&self) {
        match &self.active {
            Some(session) => session.capture.pause(),
            None => debug!("Pause ignored: no active session"),
        }
    }

    /// Resume the active session. No-op when nothing is paused.
    pub fn resume(&self) {
        match &self.active {
            Some(session) => session.capture.resume(),
            None => debug!("Resume ignored: no active session"),
        }
    }

    /// Stop the active session. Idempotent.
    ///
    /// The capture session flushes and dispatches its final partial chunk
    /// before the microphone is released; transcription requests still in
    /// flight are not cancelled and may append after this returns.
    pub async fn stop(&mut self) {
        match self.active.take() {
            Some(mut session) => {
                info!("Stopping recording session: {}", session.session_id);
                session.capture.stop().await;
            }
            None => debug!("Stop ignored: no active session"),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.active
            .as_ref()
            .map(|s| s.capture.state())
            .unwrap_or(CaptureState::Idle)
    }

    pub fn session_id(&self) -> Option<String> {
        self.active.as_ref().map(|s| s.session_id.clone())
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.entries().await
    }

    pub async fn stats(&self) -> SessionStats {
        let (session_id, started_at, chunks_dispatched) = match &self.active {
            Some(s) => (
                Some(s.session_id.clone()),
                Some(s.started_at),
                s.chunks_forwarded.load(Ordering::SeqCst),
            ),
            None => (None, None, 0),
        };

        let duration_secs = started_at
            .map(|t| Utc::now().signed_duration_since(t).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);

        SessionStats {
            state: self.state(),
            session_id,
            started_at,
            duration_secs,
            chunks_dispatched,
            transcript_entries: self.transcript.len().await,
            last_error: self.last_error.get(),
        }
    }
}

/// Routes transcription outcomes: non-empty text becomes a transcript entry,
/// empty text is silence, failures set the error slot without touching the
/// recording.
async fn consume_outcomes(
    mut outcome_rx: mpsc::Receiver<TranscribeOutcome>,
    transcript: TranscriptStore,
    last_error: ErrorSlot,
) {
    while let Some(outcome) = outcome_rx.recv().await {
        match outcome.result {
            Ok(transcription) => {
                let text = transcription.text.trim();
                if text.is_empty() {
                    debug!(chunk = outcome.chunk_index, "Empty transcription, skipping");
                    last_error.clear();
                    continue;
                }

                let entry = transcript.append_utterance(text).await;
                last_error.clear();

                info!(
                    chunk = outcome.chunk_index,
                    speaker = %entry.speaker,
                    "Transcript: {}",
                    entry.text
                );
            }
            Err(e) => {
                warn!(chunk = outcome.chunk_index, "Transcription failed: {}", e);
                last_error.set(e.to_string());
            }
        }
    }

    debug!("Outcome channel closed");
}
