use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use super::messages::{TranscribeReply, TranscribeRequest, Transcription};

#[derive(Debug, Clone, Error)]
pub enum TranscribeError {
    #[error("Transcription request timed out")]
    Timeout,

    #[error("Transcription transport error: {0}")]
    Transport(String),

    #[error("Transcription service error: {0}")]
    Service(String),

    #[error("Failed to encode transcription request: {0}")]
    Encode(String),
}

/// Boundary to the remote speech-to-text service.
///
/// One call per chunk; the service is a black box that either recognizes
/// text or reports an error. Callers decide what empty text means.
#[async_trait]
pub trait TranscribeClient: Send + Sync {
    async fn transcribe(&self, request: TranscribeRequest)
        -> Result<Transcription, TranscribeError>;
}

/// Request/reply STT transport over NATS.
pub struct NatsTranscribeClient {
    client: async_nats::Client,
    subject: String,
    request_timeout: Duration,
}

impl NatsTranscribeClient {
    /// Connect to the NATS server backing the STT service
    pub async fn connect(
        url: &str,
        subject: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            subject: subject.into(),
            request_timeout,
        })
    }
}

#[async_trait]
impl TranscribeClient for NatsTranscribeClient {
    async fn transcribe(
        &self,
        request: TranscribeRequest,
    ) -> Result<Transcription, TranscribeError> {
        let payload =
            serde_json::to_vec(&request).map_err(|e| TranscribeError::Encode(e.to_string()))?;

        let response = tokio::time::timeout(
            self.request_timeout,
            self.client.request(self.subject.clone(), payload.into()),
        )
        .await
        .map_err(|_| TranscribeError::Timeout)?
        .map_err(|e| TranscribeError::Transport(e.to_string()))?;

        let reply: TranscribeReply = serde_json::from_slice(&response.payload)
            .map_err(|e| TranscribeError::Transport(format!("invalid reply: {}", e)))?;

        if let Some(error) = reply.error {
            return Err(TranscribeError::Service(error));
        }

        Ok(Transcription {
            text: reply.text.unwrap_or_default(),
            segments: reply.segments,
        })
    }
}
