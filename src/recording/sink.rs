use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::audio::AudioProfile;

/// Single-writer WAV resource bound to one call session.
///
/// The writer lives in an `Option` so `finish` is safe to call redundantly,
/// and `Drop` finalizes the container on any exit path that skipped it.
pub struct RecordingSink {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    path: PathBuf,
    profile: AudioProfile,
    bytes_written: u64,
}

impl RecordingSink {
    /// Create the recording file under `base_dir`, creating the directory
    /// if absent. The filename carries the call ID and a capture timestamp.
    pub fn create(base_dir: &Path, call_id: &str, profile: AudioProfile) -> Result<Self> {
        if profile.sample_width != 2 {
            bail!("only 16-bit PCM recordings are supported");
        }

        fs::create_dir_all(base_dir).with_context(|| {
            format!("failed to create recording directory: {}", base_dir.display())
        })?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let path = base_dir.join(format!("received_{}_{}.wav", call_id, timestamp));

        let writer = hound::WavWriter::create(&path, profile.wav_spec())
            .with_context(|| format!("failed to create recording file: {}", path.display()))?;

        info!("recording to {}", path.display());

        Ok(Self {
            writer: Some(writer),
            path,
            profile,
            bytes_written: 0,
        })
    }

    /// Append raw little-endian PCM frames in call order.
    ///
    /// A payload that is not a whole number of frames gets its dangling
    /// bytes skipped with a warning. Returns the number of bytes written.
    pub fn append(&mut self, pcm: &[u8]) -> Result<usize> {
        let writer = match &mut self.writer {
            Some(writer) => writer,
            None => bail!("append on a closed recording sink"),
        };

        let usable = self.profile.whole_frame_bytes(pcm.len());
        if usable < pcm.len() {
            warn!(
                "chunk length {} is not a whole number of frames, skipping {} dangling byte(s)",
                pcm.len(),
                pcm.len() - usable
            );
        }

        for sample in pcm[..usable].chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([sample[0], sample[1]]))
                .context("failed to write sample to recording")?;
        }

        self.bytes_written += usable as u64;
        Ok(usable)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Finalize the container (RIFF length fields). Safe to call more than
    /// once; only the first call does any work.
    pub fn finish(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize().context("failed to finalize recording")?;
            info!(
                "recording saved to {} ({} bytes)",
                self.path.display(),
                self.bytes_written
            );
        }
        Ok(())
    }
}

impl Drop for RecordingSink {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.finalize() {
                warn!("failed to finalize recording on drop: {}", e);
            }
        }
    }
}
