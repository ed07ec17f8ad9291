// Tests for the chunk dispatcher: the pause-drop policy is evaluated at
// dispatch time, forwarded chunks are serialized for transport, and the
// capture side never waits on transcription.

mod common;

use base64::Engine;
use common::FakeTranscribeClient;
use live_scribe::audio::AudioChunk;
use live_scribe::capture::{CaptureState, StateCell};
use live_scribe::dispatch::{ChunkDispatcher, TranscribeOutcome};
use live_scribe::stt::TranscribeError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

fn wav_chunk(index: usize) -> AudioChunk {
    AudioChunk {
        index,
        data: vec![1, 2, 3, 4],
        start_ms: 0,
        end_ms: 100,
        sample_rate: 16000,
        channels: 1,
        sample_count: 2,
    }
}

fn dispatcher_with(
    client: Arc<FakeTranscribeClient>,
    state: Arc<StateCell>,
) -> (
    ChunkDispatcher,
    mpsc::Receiver<TranscribeOutcome>,
    Arc<AtomicUsize>,
) {
    let forwarded = Arc::new(AtomicUsize::new(0));
    let (outcome_tx, outcome_rx) = mpsc::channel(16);

    let dispatcher = ChunkDispatcher::new(
        "session-test".to_string(),
        client,
        state,
        Arc::clone(&forwarded),
        outcome_tx,
    );

    (dispatcher, outcome_rx, forwarded)
}

#[tokio::test]
async fn forwards_chunk_while_recording() {
    let client = Arc::new(FakeTranscribeClient::with_replies(vec![
        FakeTranscribeClient::ok("hello"),
    ]));
    let state = Arc::new(StateCell::new(CaptureState::Recording));
    let (dispatcher, mut outcome_rx, forwarded) = dispatcher_with(Arc::clone(&client), state);

    dispatcher.dispatch(wav_chunk(0));

    let outcome = outcome_rx.recv().await.expect("outcome expected");
    assert_eq!(outcome.chunk_index, 0);
    assert_eq!(outcome.result.unwrap().text, "hello");
    assert_eq!(forwarded.load(Ordering::SeqCst), 1);

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].session_id, "session-test");
    assert_eq!(requests[0].chunk_index, 0);
    assert_eq!(requests[0].sample_rate, 16000);

    // The payload is the chunk's WAV bytes, base64-encoded
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(&requests[0].audio)
        .unwrap();
    assert_eq!(decoded, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn drops_chunk_while_paused() {
    let client = Arc::new(FakeTranscribeClient::new());
    let state = Arc::new(StateCell::new(CaptureState::Paused));
    let (dispatcher, mut outcome_rx, forwarded) = dispatcher_with(Arc::clone(&client), state);

    dispatcher.dispatch(wav_chunk(0));
    sleep(Duration::from_millis(100)).await;

    assert_eq!(client.request_count(), 0);
    assert_eq!(forwarded.load(Ordering::SeqCst), 0);
    assert!(outcome_rx.try_recv().is_err());
}

#[tokio::test]
async fn forwards_final_flush_after_stop() {
    // After stop the state is Idle, not Paused, so the flush goes through
    let client = Arc::new(FakeTranscribeClient::new());
    let state = Arc::new(StateCell::new(CaptureState::Idle));
    let (dispatcher, mut outcome_rx, _forwarded) = dispatcher_with(Arc::clone(&client), state);

    dispatcher.dispatch(wav_chunk(7));

    let outcome = outcome_rx.recv().await.expect("outcome expected");
    assert_eq!(outcome.chunk_index, 7);
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn failure_outcome_carries_the_error() {
    let client = Arc::new(FakeTranscribeClient::with_replies(vec![Err(
        TranscribeError::Service("timeout".to_string()),
    )]));
    let state = Arc::new(StateCell::new(CaptureState::Recording));
    let (dispatcher, mut outcome_rx, _forwarded) = dispatcher_with(client, state);

    dispatcher.dispatch(wav_chunk(0));

    let outcome = outcome_rx.recv().await.expect("outcome expected");
    match outcome.result {
        Err(TranscribeError::Service(message)) => assert_eq!(message, "timeout"),
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn multiple_chunks_may_be_in_flight() {
    let client = Arc::new(FakeTranscribeClient::new());
    let state = Arc::new(StateCell::new(CaptureState::Recording));
    let (dispatcher, mut outcome_rx, forwarded) = dispatcher_with(Arc::clone(&client), state);

    for i in 0..5 {
        dispatcher.dispatch(wav_chunk(i));
    }

    let mut seen = Vec::new();
    for _ in 0..5 {
        let outcome = outcome_rx.recv().await.expect("outcome expected");
        seen.push(outcome.chunk_index);
    }

    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    assert_eq!(forwarded.load(Ordering::SeqCst), 5);
    assert_eq!(client.request_count(), 5);
}
