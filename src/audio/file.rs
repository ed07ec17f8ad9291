use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hound::WavReader;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use super::capture::{AudioCapture, AudioFrame, CaptureConfig, CaptureError, CaptureProvider};

/// Streams a WAV file as if it were a live capture source.
///
/// Frames are cut to the configured buffer duration; with `realtime` set they
/// are paced at that cadence so chunk timing behaves like a real device.
pub struct WavFileCapture {
    path: PathBuf,
    config: CaptureConfig,
    realtime: bool,
    capturing: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl WavFileCapture {
    pub fn new(path: impl Into<PathBuf>, config: CaptureConfig, realtime: bool) -> Self {
        Self {
            path: path.into(),
            config,
            realtime,
            capturing: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioCapture for WavFileCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        let reader = WavReader::open(&self.path).map_err(|e| {
            CaptureError::Backend(format!("Failed to open WAV file {}: {}", self.path.display(), e))
        })?;

        let spec = reader.spec();
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(CaptureError::UnsupportedFormat(format!(
                "{:?} {}-bit (expected 16-bit int PCM)",
                spec.sample_format, spec.bits_per_sample
            )));
        }

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CaptureError::Backend(format!("Failed to read samples: {}", e)))?;

        info!(
            "Streaming WAV file: {} ({} samples, {} Hz, {} ch)",
            self.path.display(),
            samples.len(),
            spec.sample_rate,
            spec.channels
        );

        let buffer_ms = self.config.buffer_duration_ms.max(1);
        let frame_len =
            (spec.sample_rate as u64 * buffer_ms / 1000) as usize * spec.channels as usize;

        let (tx, rx) = mpsc::channel(64);
        self.capturing.store(true, Ordering::SeqCst);
        let capturing = Arc::clone(&self.capturing);
        let realtime = self.realtime;

        let task = tokio::spawn(async move {
            let mut timestamp_ms = 0u64;

            for block in samples.chunks(frame_len.max(1)) {
                if !capturing.load(Ordering::SeqCst) {
                    break;
                }

                let frame = AudioFrame {
                    samples: block.to_vec(),
                    sample_rate: spec.sample_rate,
                    channels: spec.channels,
                    timestamp_ms,
                };

                if tx.send(frame).await.is_err() {
                    break;
                }

                timestamp_ms += buffer_ms;

                if realtime {
                    sleep(Duration::from_millis(buffer_ms)).await;
                }
            }

            capturing.store(false, Ordering::SeqCst);
            debug!("WAV stream ended");
        });

        self.task = Some(task);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.capturing.store(false, Ordering::SeqCst);

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "wav file"
    }
}

/// Opens `WavFileCapture` backends for a fixed file path.
#[derive(Debug, Clone)]
pub struct WavFileProvider {
    pub path: PathBuf,
    pub realtime: bool,
}

impl WavFileProvider {
    pub fn new(path: impl Into<PathBuf>, realtime: bool) -> Self {
        Self {
            path: path.into(),
            realtime,
        }
    }
}

impl CaptureProvider for WavFileProvider {
    fn open(&self, config: &CaptureConfig) -> Result<Box<dyn AudioCapture>, CaptureError> {
        Ok(Box::new(WavFileCapture::new(
            self.path.clone(),
            config.clone(),
            self.realtime,
        )))
    }
}
