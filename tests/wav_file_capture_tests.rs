// Tests for the WAV file capture source used by demos and batch runs.

use anyhow::Result;
use live_scribe::audio::{AudioCapture, CaptureConfig, WavFileCapture};
use std::path::Path;
use tempfile::TempDir;

fn write_wav(path: &Path, samples: &[i16], sample_rate: u32, channels: u16) -> Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

#[tokio::test]
async fn streams_all_samples_in_order() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("fixture.wav");

    let samples: Vec<i16> = (0..1600).map(|i| i as i16).collect();
    write_wav(&path, &samples, 16000, 1)?;

    let mut capture = WavFileCapture::new(&path, CaptureConfig::default(), false);
    let mut rx = capture.start().await?;

    let mut received = Vec::new();
    let mut last_timestamp = 0;
    while let Some(frame) = rx.recv().await {
        assert_eq!(frame.sample_rate, 16000);
        assert_eq!(frame.channels, 1);
        assert!(frame.timestamp_ms >= last_timestamp);
        last_timestamp = frame.timestamp_ms;
        received.extend_from_slice(&frame.samples);
    }

    assert_eq!(received, samples);

    capture.stop().await?;
    Ok(())
}

#[tokio::test]
async fn missing_file_fails_to_start() {
    let mut capture = WavFileCapture::new(
        "/nonexistent/fixture.wav",
        CaptureConfig::default(),
        false,
    );

    assert!(capture.start().await.is_err());
    assert!(!capture.is_capturing());
}

#[tokio::test]
async fn rejects_float_wav() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("float.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec)?;
    writer.write_sample(0.5f32)?;
    writer.finalize()?;

    let mut capture = WavFileCapture::new(&path, CaptureConfig::default(), false);
    assert!(capture.start().await.is_err());
    Ok(())
}
