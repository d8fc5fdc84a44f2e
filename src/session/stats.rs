use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// How a session reached `Terminated`.
///
/// `ResourceError` marks sink acquisition or write failures and must stay
/// distinguishable from the normal end-of-call outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Client sent an explicit disconnect
    Disconnected,
    /// Peer closed the inbound stream
    StreamClosed,
    /// No inbound message within the configured idle window
    IdleTimeout,
    /// Recording sink could not be acquired or written
    ResourceError,
}

/// Final accounting for one finished session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub call_id: String,
    pub outcome: SessionOutcome,

    /// Total PCM bytes appended to the recording
    pub bytes_written: u64,

    /// Chunks accepted and echoed
    pub chunks_accepted: u64,

    /// Chunks dropped before the sink was open
    pub chunks_dropped: u64,

    /// Where the recording landed, if a sink was ever opened
    pub recording_path: Option<PathBuf>,

    pub finished_at: DateTime<Utc>,
}
