// Live session demo: microphone → chunked transcription over NATS
//
// Records from the default microphone for 20 seconds, pausing and resuming
// halfway to show the chunk-drop policy, then prints the transcript.
//
// Prerequisites:
// - NATS server running: docker run -p 4222:4222 nats
// - An STT service answering request/reply on stt.transcribe
//
// Usage: cargo run --example live_session

use anyhow::Result;
use live_scribe::audio::MicrophoneProvider;
use live_scribe::{NatsTranscribeClient, SessionConfig, SessionController};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

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

    let mut controller =
        SessionController::new(config, Arc::new(MicrophoneProvider), Arc::new(client));

    let session_id = controller.start().await?;
    info!("Recording ({}) - speak into your microphone", session_id);

    sleep(Duration::from_secs(8)).await;

    info!("Pausing for 4 seconds (chunks emitted now are dropped)");
    controller.pause();
    sleep(Duration::from_secs(4)).await;

    controller.resume();
    info!("Resumed");
    sleep(Duration::from_secs(8)).await;

    controller.stop().await;
    info!("Stopped, waiting for in-flight transcriptions");
    sleep(Duration::from_secs(3)).await;

    let entries = controller.transcript().await;
    println!("\n=== Transcript ({} entries) ===", entries.len());
    for entry in entries {
        println!(
            "[{}] {}: {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.speaker,
            entry.text
        );
    }

    if let Some(error) = controller.last_error() {
        println!("Last error: {}", error);
    }

    Ok(())
}
