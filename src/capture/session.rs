use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::state::{CaptureState, StateCell};
use crate::audio::{AudioCapture, AudioChunk, AudioFrame, CaptureConfig, CaptureError, SegmentEncoder};

/// Receives completed chunks from the capture pump.
///
/// Emission is a direct call, not a registered global callback: the session
/// owns its consumer and hands each chunk over exactly once.
pub trait ChunkConsumer: Send + Sync {
    fn accept(&self, chunk: AudioChunk);
}

/// A capture session: owns the live audio stream and the segment encoder,
/// runs the Idle/Recording/Paused state machine, and emits one chunk per
/// timer interval.
///
/// All state transitions are expected to come from a single control task;
/// the shared `StateCell` exists so the pump and the dispatcher can read the
/// state concurrently, not so transitions can race.
pub struct CaptureSession {
    state: Arc<StateCell>,
    shutdown_tx: watch::Sender<bool>,
    pump: Option<JoinHandle<()>>,
}

impl CaptureSession {
    /// Start capturing: opens the backend, transitions Idle→Recording and
    /// spawns the pump task. On failure the state stays Idle and no capture
    /// resources remain allocated.
    pub async fn start(
        mut backend: Box<dyn AudioCapture>,
        config: CaptureConfig,
        chunk_interval: Duration,
        consumer: Box<dyn ChunkConsumer>,
        state: Arc<StateCell>,
    ) -> Result<Self, CaptureError> {
        let frame_rx = backend.start().await?;

        info!(
            "Capture started: {} (chunk interval {:?})",
            backend.name(),
            chunk_interval
        );

        state.set(CaptureState::Recording);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let pump_state = Arc::clone(&state);

        let pump = tokio::spawn(pump_loop(
            backend,
            frame_rx,
            config,
            chunk_interval,
            consumer,
            pump_state,
            shutdown_rx,
        ));

        Ok(Self {
            state,
            shutdown_tx,
            pump: Some(pump),
        })
    }

    /// Suspend encoding. Valid only from Recording; a no-op otherwise.
    ///
    /// The chunk timer keeps firing while paused; anything it emits is
    /// dropped downstream by the dispatcher's pause policy.
    pub fn pause(&self) {
        if self.state.transition(CaptureState::Recording, CaptureState::Paused) {
            info!("Capture paused");
        } else {
            debug!("Pause ignored in state {:?}", self.state.get());
        }
    }

    /// Resume encoding. Valid only from Paused; a no-op otherwise.
    pub fn resume(&self) {
        if self.state.transition(CaptureState::Paused, CaptureState::Recording) {
            info!("Capture resumed");
        } else {
            debug!("Resume ignored in state {:?}", self.state.get());
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state.get()
    }

    /// Stop capturing. Idempotent.
    ///
    /// Moves the state to Idle *before* signalling the pump, so the final
    /// partial chunk the pump flushes is never swallowed by the pause policy.
    /// Awaits the pump, which stops the backend, so the microphone is
    /// released by the time this returns.
    pub async fn stop(&mut self) {
        let Some(pump) = self.pump.take() else {
            debug!("Stop ignored: capture already stopped");
            return;
        };

        self.state.set(CaptureState::Idle);
        let _ = self.shutdown_tx.send(true);

        if let Err(e) = pump.await {
            error!("Capture pump panicked: {}", e);
        }

        info!("Capture stopped");
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if self.pump.is_some() {
            self.state.set(CaptureState::Idle);
            let _ = self.shutdown_tx.send(true);
        }
    }
}

async fn pump_loop(
    mut backend: Box<dyn AudioCapture>,
    mut frame_rx: tokio::sync::mpsc::Receiver<AudioFrame>,
    config: CaptureConfig,
    chunk_interval: Duration,
    consumer: Box<dyn ChunkConsumer>,
    state: Arc<StateCell>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut encoder = SegmentEncoder::new();

    let mut ticker = interval_at(Instant::now() + chunk_interval, chunk_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!("Capture pump started");

    loop {
        tokio::select! {
            frame = frame_rx.recv() => {
                match frame {
                    Some(frame) => {
                        // Paused (or already stopping): encoding is suspended
                        if state.get() != CaptureState::Recording {
                            continue;
                        }

                        let frame = process_frame(
                            frame,
                            config.target_sample_rate,
                            config.target_channels,
                        );
                        encoder.push_frame(&frame);
                    }
                    None => {
                        debug!("Audio stream ended");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                emit_segment(&mut encoder, consumer.as_ref(), false);
            }
            _ = shutdown_rx.changed() => {
                break;
            }
        }
    }

    // Teardown (explicit stop or the stream ending on its own): back to Idle
    // first so the final flush is never swallowed by the pause policy.
    state.set(CaptureState::Idle);

    // Final flush: whatever is buffered goes out, even short of a full interval
    emit_segment(&mut encoder, consumer.as_ref(), true);

    if let Err(e) = backend.stop().await {
        warn!("Failed to stop capture backend: {}", e);
    }

    debug!("Capture pump stopped");
}

fn emit_segment(encoder: &mut SegmentEncoder, consumer: &dyn ChunkConsumer, final_flush: bool) {
    match encoder.finalize() {
        Ok(Some(chunk)) => {
            debug!(
                chunk = chunk.index,
                samples = chunk.sample_count,
                final_flush,
                "Chunk boundary"
            );
            consumer.accept(chunk);
        }
        Ok(None) => {}
        Err(e) => error!("Failed to finalize audio segment: {:#}", e),
    }
}

/// Convert a frame to the target format: mono mixdown first, then
/// downsampling, so decimation never straddles interleaved channels.
fn process_frame(frame: AudioFrame, target_sample_rate: u32, target_channels: u16) -> AudioFrame {
    let mut processed = frame;

    if processed.channels != target_channels && target_channels == 1 {
        processed = mix_to_mono(processed);
    }

    if processed.sample_rate > target_sample_rate {
        processed = downsample_frame(processed, target_sample_rate);
    }

    processed
}

/// Downsample by nearest-sample decimation. Upsampling is not supported;
/// lower-rate frames pass through with their actual rate.
fn downsample_frame(frame: AudioFrame, target_rate: u32) -> AudioFrame {
    if frame.sample_rate <= target_rate {
        return frame;
    }

    let src = frame.sample_rate as u64;
    let dst = target_rate as u64;
    let out_len = (frame.samples.len() as u64 * dst / src) as usize;

    let downsampled: Vec<i16> = (0..out_len)
        .map(|i| frame.samples[(i as u64 * src / dst) as usize])
        .collect();

    AudioFrame {
        samples: downsampled,
        sample_rate: target_rate,
        channels: frame.channels,
        timestamp_ms: frame.timestamp_ms,
    }
}

/// Mix interleaved multi-channel audio down to mono by summing channels
/// (clamped, no division, to preserve volume on quiet sources).
fn mix_to_mono(frame: AudioFrame) -> AudioFrame {
    if frame.channels <= 1 {
        return frame;
    }

    let channels = frame.channels as usize;
    let mut mono_samples = Vec::with_capacity(frame.samples.len() / channels);

    for group in frame.samples.chunks_exact(channels) {
        let sum: i32 = group.iter().map(|&s| s as i32).sum();
        mono_samples.push(sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16);
    }

    AudioFrame {
        samples: mono_samples,
        sample_rate: frame.sample_rate,
        channels: 1,
        timestamp_ms: frame.timestamp_ms,
    }
}
