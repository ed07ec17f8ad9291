// File session demo: streams a WAV file through the live pipeline
//
// Useful for exercising chunking and transcription without a microphone.
//
// Prerequisites:
// - NATS server + STT service (see live_session demo)
//
// Usage: cargo run --example file_session -- path/to/audio.wav

use anyhow::{bail, Result};
use live_scribe::audio::WavFileProvider;
use live_scribe::{CaptureState, NatsTranscribeClient, SessionConfig, SessionController};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("Usage: file_session <path/to/audio.wav>");
    };

    let client = NatsTranscribeClient::connect(
        "nats://localhost:4222",
        "stt.transcribe",
        Duration::from_secs(15),
    )
    .await?;

    let config = SessionConfig {
        chunk_interval: Duration::from_secs(5),
        ..SessionConfig::default()
    };

    let provider = WavFileProvider::new(path, true);
    let mut controller = SessionController::new(config, Arc::new(provider), Arc::new(client));

    controller.start().await?;
    info!("Streaming file through the pipeline");

    // The file source closes its stream when the samples run out; poll until
    // the transcript stops growing, then stop the session.
    let mut last_len = 0;
    loop {
        sleep(Duration::from_secs(2)).await;

        if controller.state() == CaptureState::Idle {
            break;
        }

        let len = controller.transcript().await.len();
        info!("Transcript entries so far: {}", len);
        if len == last_len && len > 0 {
            break;
        }
        last_len = len;
    }

    controller.stop().await;
    sleep(Duration::from_secs(2)).await;

    for entry in controller.transcript().await {
        println!("{}: {}", entry.speaker, entry.text);
    }

    Ok(())
}
