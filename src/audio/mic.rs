use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use super::capture::{AudioCapture, AudioFrame, CaptureConfig, CaptureError, CaptureProvider};

/// Live microphone capture via cpal.
///
/// The cpal stream is not `Send`, so it lives on a dedicated thread for the
/// whole capture. `start` waits for a readiness handshake from that thread so
/// permission and device failures surface to the caller instead of being
/// logged from a detached thread.
pub struct MicrophoneCapture {
    config: CaptureConfig,
    running: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl MicrophoneCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioCapture for MicrophoneCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.is_capturing() {
            return Err(CaptureError::Backend("capture already started".to_string()));
        }

        let (frame_tx, frame_rx) = mpsc::channel(64);
        let (ready_tx, ready_rx) = oneshot::channel();

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let config = self.config.clone();

        let worker = thread::spawn(move || {
            run_capture(config, running, frame_tx, ready_tx);
        });

        match ready_rx.await {
            Ok(Ok(())) => {
                self.worker = Some(worker);
                Ok(frame_rx)
            }
            Ok(Err(e)) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = worker.join();
                Err(e)
            }
            Err(_) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = worker.join();
                Err(CaptureError::Backend(
                    "capture thread exited before reporting readiness".to_string(),
                ))
            }
        }
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.running.store(false, Ordering::SeqCst);

        if let Some(worker) = self.worker.take() {
            let _ = tokio::task::spawn_blocking(move || worker.join()).await;
        }

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "microphone (cpal)"
    }
}

/// Opens `MicrophoneCapture` backends for the session controller.
#[derive(Debug, Default)]
pub struct MicrophoneProvider;

impl CaptureProvider for MicrophoneProvider {
    fn open(&self, config: &CaptureConfig) -> Result<Box<dyn AudioCapture>, CaptureError> {
        Ok(Box::new(MicrophoneCapture::new(config.clone())))
    }
}

fn run_capture(
    config: CaptureConfig,
    running: Arc<AtomicBool>,
    frame_tx: mpsc::Sender<AudioFrame>,
    ready_tx: oneshot::Sender<Result<(), CaptureError>>,
) {
    match open_stream(&config, frame_tx) {
        Ok(stream) => {
            let _ = ready_tx.send(Ok(()));

            // Keep thread alive while recording
            while running.load(Ordering::SeqCst) {
                thread::sleep(std::time::Duration::from_millis(100));
            }

            // Dropping the stream releases the device
            drop(stream);
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
        }
    }
}

fn open_stream(
    config: &CaptureConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
) -> Result<cpal::Stream, CaptureError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(CaptureError::NoInputDevice)?;

    let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());
    let stream_config = device.default_input_config().map_err(map_config_error)?;

    let sample_rate = stream_config.sample_rate().0;
    let channels = stream_config.channels();

    // cpal has no portable echo-cancellation/noise-suppression switches; the
    // constraints ride along so platform stacks that honor them can apply them.
    info!(
        "Opening input device '{}': {} Hz, {} ch (target {} Hz, {} ch, echo_cancellation={}, noise_suppression={})",
        device_name,
        sample_rate,
        channels,
        config.target_sample_rate,
        config.target_channels,
        config.echo_cancellation,
        config.noise_suppression,
    );

    let sender = FrameSender {
        tx: frame_tx,
        sample_rate,
        channels,
        started: Instant::now(),
    };

    let err_fn = |err| warn!("Audio stream error: {}", err);

    let stream = match stream_config.sample_format() {
        SampleFormat::F32 => device
            .build_input_stream(
                &stream_config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples = data
                        .iter()
                        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                        .collect();
                    sender.send(samples);
                },
                err_fn,
                None,
            )
            .map_err(map_build_error)?,
        SampleFormat::I16 => device
            .build_input_stream(
                &stream_config.into(),
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    sender.send(data.to_vec());
                },
                err_fn,
                None,
            )
            .map_err(map_build_error)?,
        SampleFormat::U16 => device
            .build_input_stream(
                &stream_config.into(),
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    let samples = data.iter().map(|&s| (s as i32 - 32768) as i16).collect();
                    sender.send(samples);
                },
                err_fn,
                None,
            )
            .map_err(map_build_error)?,
        other => {
            return Err(CaptureError::UnsupportedFormat(format!("{:?}", other)));
        }
    };

    stream.play().map_err(|e| match e {
        cpal::PlayStreamError::DeviceNotAvailable => CaptureError::NoInputDevice,
        other => CaptureError::Backend(other.to_string()),
    })?;

    Ok(stream)
}

#[derive(Clone)]
struct FrameSender {
    tx: mpsc::Sender<AudioFrame>,
    sample_rate: u32,
    channels: u16,
    started: Instant,
}

impl FrameSender {
    fn send(&self, samples: Vec<i16>) {
        let frame = AudioFrame {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
            timestamp_ms: self.started.elapsed().as_millis() as u64,
        };

        // Drop the frame rather than block the audio callback
        let _ = self.tx.try_send(frame);
    }
}

fn map_config_error(e: cpal::DefaultStreamConfigError) -> CaptureError {
    match e {
        cpal::DefaultStreamConfigError::DeviceNotAvailable => CaptureError::NoInputDevice,
        cpal::DefaultStreamConfigError::StreamTypeNotSupported => {
            CaptureError::UnsupportedFormat("no supported input stream type".to_string())
        }
        cpal::DefaultStreamConfigError::BackendSpecific { err } => backend_or_denied(err),
    }
}

fn map_build_error(e: cpal::BuildStreamError) -> CaptureError {
    match e {
        cpal::BuildStreamError::DeviceNotAvailable => CaptureError::NoInputDevice,
        cpal::BuildStreamError::StreamConfigNotSupported => {
            CaptureError::UnsupportedFormat("input stream config not supported".to_string())
        }
        cpal::BuildStreamError::BackendSpecific { err } => backend_or_denied(err),
        other => CaptureError::Backend(other.to_string()),
    }
}

fn backend_or_denied(err: cpal::BackendSpecificError) -> CaptureError {
    let description = err.description.to_lowercase();
    if description.contains("denied") || description.contains("permission") {
        CaptureError::PermissionDenied
    } else {
        CaptureError::Backend(err.description)
    }
}
