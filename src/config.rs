use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::audio::AudioProfile;
use crate::session::SessionPolicy;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub recording: RecordingConfig,
    pub audio: AudioConfig,
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct RecordingConfig {
    /// Base directory for per-call recordings, created at first use
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    /// Bytes per sample (2 = 16-bit PCM)
    pub sample_width: u16,
    pub channels: u16,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    /// When true the sink opens on an explicit start message; when false
    /// it opens lazily on the first audio chunk
    pub require_start_message: bool,

    /// Fixed annotation attached to every echoed chunk, if any
    pub echo_annotation: Option<String>,

    /// Artificial delay before each outbound message, to simulate
    /// processing latency
    pub response_delay_ms: Option<u64>,

    /// Sessions receiving no inbound message within this window are
    /// terminated through normal teardown
    pub idle_timeout_secs: Option<u64>,

    /// Maximum number of concurrent call sessions; excess connections
    /// are rejected
    pub max_sessions: usize,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// The fixed PCM profile every recording uses.
    pub fn profile(&self) -> AudioProfile {
        AudioProfile {
            sample_rate: self.audio.sample_rate,
            sample_width: self.audio.sample_width,
            channels: self.audio.channels,
        }
    }

    /// Per-session behavior knobs derived from the loaded settings.
    pub fn policy(&self) -> SessionPolicy {
        SessionPolicy {
            require_start_message: self.session.require_start_message,
            annotation: self.session.echo_annotation.clone(),
            response_delay: self.session.response_delay_ms.map(Duration::from_millis),
            idle_timeout: self.session.idle_timeout_secs.map(Duration::from_secs),
        }
    }
}
