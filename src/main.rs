use anyhow::{Context, Result};
use clap::Parser;
use live_scribe::audio::MicrophoneProvider;
use live_scribe::{create_router, AppState, Config, NatsTranscribeClient, SessionController};
use std::sync::Arc;
use tracing::info;

/// Live transcription service: microphone capture, chunked speech-to-text,
/// transcript over HTTP
#[derive(Debug, Parser)]
#[command(name = "live-scribe", version)]
struct Args {
    /// Path to the configuration file (extension optional)
    #[arg(short, long, default_value = "config/live-scribe")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);
    info!(
        "Chunk interval: {}ms, target format: {} Hz, {} ch",
        cfg.audio.chunk_interval_ms, cfg.audio.sample_rate, cfg.audio.channels
    );

    let client = NatsTranscribeClient::connect(
        &cfg.stt.nats_url,
        cfg.stt.subject.clone(),
        cfg.request_timeout(),
    )
    .await?;

    let controller = SessionController::new(
        cfg.session_config(),
        Arc::new(MicrophoneProvider),
        Arc::new(client),
    );

    let state = AppState::new(controller);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP API listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server error")?;

    Ok(())
}
