use anyhow::{Context, Result};
use std::io::Cursor;

use super::capture::AudioFrame;

/// A completed audio segment: one WAV payload covering one chunk interval.
///
/// Immutable once produced; ownership moves to the dispatcher on emission.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Chunk number within the session (0-indexed, gap-free)
    pub index: usize,
    /// Complete WAV payload (header + samples)
    pub data: Vec<u8>,
    /// Start time in milliseconds since capture started
    pub start_ms: u64,
    /// End time in milliseconds since capture started
    pub end_ms: u64,
    /// Sample rate
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Number of samples in this chunk
    pub sample_count: usize,
}

/// Accumulates audio frames and finalizes them into in-memory WAV chunks.
///
/// `finalize` closes the current segment and implicitly begins the next one,
/// so a sample can never fall between two segments: frames are appended
/// whole, and the boundary only ever lands between frame appends.
pub struct SegmentEncoder {
    samples: Vec<i16>,
    format: Option<(u32, u16)>,
    segment_start_ms: u64,
    last_timestamp_ms: u64,
    next_index: usize,
}

impl SegmentEncoder {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            format: None,
            segment_start_ms: 0,
            last_timestamp_ms: 0,
            next_index: 0,
        }
    }

    /// Append one frame to the current segment. The segment's format follows
    /// the first frame appended to it.
    pub fn push_frame(&mut self, frame: &AudioFrame) {
        if self.samples.is_empty() {
            self.segment_start_ms = frame.timestamp_ms;
            self.format = Some((frame.sample_rate, frame.channels));
        }

        self.samples.extend_from_slice(&frame.samples);
        self.last_timestamp_ms = frame.timestamp_ms;
    }

    pub fn buffered_samples(&self) -> usize {
        self.samples.len()
    }

    /// Close the current segment into a chunk and begin the next one.
    ///
    /// Returns `None` when nothing was buffered (e.g. a timer tick that fired
    /// mid-pause), so empty chunks are never emitted.
    pub fn finalize(&mut self) -> Result<Option<AudioChunk>> {
        if self.samples.is_empty() {
            return Ok(None);
        }

        let (sample_rate, channels) = self.format.take().unwrap_or((16000, 1));
        let samples = std::mem::take(&mut self.samples);

        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut data = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut data), spec)
                .context("Failed to create in-memory WAV writer")?;

            for &sample in &samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to WAV")?;
            }

            writer.finalize().context("Failed to finalize WAV chunk")?;
        }

        let chunk = AudioChunk {
            index: self.next_index,
            data,
            start_ms: self.segment_start_ms,
            end_ms: self.last_timestamp_ms,
            sample_rate,
            channels,
            sample_count: samples.len(),
        };

        self.next_index += 1;

        Ok(Some(chunk))
    }
}

impl Default for SegmentEncoder {
    fn default() -> Self {
        Self::new()
    }
}
