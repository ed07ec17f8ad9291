use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::session::SessionConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub stt: SttConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Chunk boundary period in milliseconds
    pub chunk_interval_ms: u64,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
}

#[derive(Debug, Deserialize)]
pub struct SttConfig {
    pub nats_url: String,
    pub subject: String,
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from `path` (extension resolved by the config
    /// crate), falling back to built-in defaults for anything unset. The
    /// file itself is optional.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "live-scribe")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 8787)?
            .set_default("audio.sample_rate", 16000)?
            .set_default("audio.channels", 1)?
            .set_default("audio.chunk_interval_ms", 5000)?
            .set_default("audio.echo_cancellation", true)?
            .set_default("audio.noise_suppression", true)?
            .set_default("stt.nats_url", "nats://localhost:4222")?
            .set_default("stt.subject", "stt.transcribe")?
            .set_default("stt.request_timeout_ms", 15000)?
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Session settings derived from the audio section
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            chunk_interval: Duration::from_millis(self.audio.chunk_interval_ms),
            sample_rate: self.audio.sample_rate,
            channels: self.audio.channels,
            echo_cancellation: self.audio.echo_cancellation,
            noise_suppression: self.audio.noise_suppression,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.stt.request_timeout_ms)
    }
}
