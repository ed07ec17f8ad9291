// Shared test doubles: a scriptable capture backend, a capture provider that
// can be told to fail, a chunk-collecting consumer, and a transcription
// client that answers from a fixed script.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use live_scribe::audio::{
    AudioCapture, AudioChunk, AudioFrame, CaptureConfig, CaptureError, CaptureProvider,
};
use live_scribe::capture::ChunkConsumer;
use live_scribe::stt::{TranscribeClient, TranscribeError, TranscribeRequest, Transcription};
use tokio::sync::mpsc;

/// A mono 16kHz frame of `n` samples at the given timestamp.
pub fn frame(n: usize, timestamp_ms: u64) -> AudioFrame {
    AudioFrame {
        samples: vec![100i16; n],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms,
    }
}

/// Capture backend driven by the test: frames pushed into the returned sender
/// appear on the session's frame channel; dropping the sender ends the stream.
pub struct ScriptedCapture {
    rx: Option<mpsc::Receiver<AudioFrame>>,
    capturing: Arc<AtomicBool>,
}

impl ScriptedCapture {
    pub fn new() -> (Self, mpsc::Sender<AudioFrame>) {
        let (tx, rx) = mpsc::channel(256);
        (
            Self {
                rx: Some(rx),
                capturing: Arc::new(AtomicBool::new(false)),
            },
            tx,
        )
    }
}

#[async_trait]
impl AudioCapture for ScriptedCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        self.capturing.store(true, Ordering::SeqCst);
        Ok(self.rx.take().expect("scripted capture started twice"))
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.capturing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Provider handing out scripted captures. The feed sender for each opened
/// backend is retrievable by the test; `failing` makes the next open fail.
pub struct ScriptedProvider {
    feeds: Mutex<Vec<mpsc::Sender<AudioFrame>>>,
    fail_with: Mutex<Option<CaptureError>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            feeds: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    pub fn failing(err: CaptureError) -> Self {
        Self {
            feeds: Mutex::new(Vec::new()),
            fail_with: Mutex::new(Some(err)),
        }
    }

    pub fn latest_feed(&self) -> mpsc::Sender<AudioFrame> {
        self.feeds
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no capture opened yet")
    }

    pub fn opened_count(&self) -> usize {
        self.feeds.lock().unwrap().len()
    }
}

impl CaptureProvider for ScriptedProvider {
    fn open(&self, _config: &CaptureConfig) -> Result<Box<dyn AudioCapture>, CaptureError> {
        if let Some(err) = self.fail_with.lock().unwrap().take() {
            return Err(err);
        }

        let (capture, feed) = ScriptedCapture::new();
        self.feeds.lock().unwrap().push(feed);
        Ok(Box::new(capture))
    }
}

/// Chunk consumer that just collects everything it is handed.
#[derive(Clone, Default)]
pub struct CollectingConsumer {
    chunks: Arc<Mutex<Vec<AudioChunk>>>,
}

impl CollectingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunks(&self) -> Vec<AudioChunk> {
        self.chunks.lock().unwrap().clone()
    }
}

impl ChunkConsumer for CollectingConsumer {
    fn accept(&self, chunk: AudioChunk) {
        self.chunks.lock().unwrap().push(chunk);
    }
}

/// Transcription client that records every request and answers from a fixed
/// script, falling back to empty text (silence) once the script runs out.
pub struct FakeTranscribeClient {
    requests: Mutex<Vec<TranscribeRequest>>,
    replies: Mutex<VecDeque<Result<Transcription, TranscribeError>>>,
}

impl FakeTranscribeClient {
    pub fn new() -> Self {
        Self::with_replies(Vec::new())
    }

    pub fn with_replies(replies: Vec<Result<Transcription, TranscribeError>>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    pub fn ok(text: &str) -> Result<Transcription, TranscribeError> {
        Ok(Transcription {
            text: text.to_string(),
            segments: Vec::new(),
        })
    }

    pub fn requests(&self) -> Vec<TranscribeRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TranscribeClient for FakeTranscribeClient {
    async fn transcribe(
        &self,
        request: TranscribeRequest,
    ) -> Result<Transcription, TranscribeError> {
        self.requests.lock().unwrap().push(request);

        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(Transcription {
                text: String::new(),
                segments: Vec::new(),
            })
        })
    }
}
