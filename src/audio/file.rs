use anyhow::{Context, Result};
use hound::WavReader;
use std::path::Path;
use tracing::info;

use super::profile::AudioProfile;

/// A finished recording read back from disk, used to inspect what a
/// session actually wrote.
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let reader = WavReader::open(path)
            .with_context(|| format!("failed to open recording: {}", path.display()))?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("failed to read recording samples")?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        info!(
            "recording loaded: {:.1}s, {}Hz, {} channels, {} samples",
            duration_seconds,
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }

    /// Raw PCM payload size in bytes (16-bit samples).
    pub fn data_bytes(&self) -> usize {
        self.samples.len() * 2
    }

    pub fn matches_profile(&self, profile: &AudioProfile) -> bool {
        self.sample_rate == profile.sample_rate && self.channels == profile.channels
    }
}
