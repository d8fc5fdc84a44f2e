use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::echo::echo_chunk;
use super::policy::SessionPolicy;
use super::stats::{SessionOutcome, SessionStats};
use crate::audio::AudioProfile;
use crate::messages::{AudioChunk, ClientMessage, ClientPayload, InitialInfo, ServerMessage};
use crate::recording::RecordingSink;

/// Call ID used until (or unless) the client supplies one.
const UNKNOWN_CALL_ID: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingStart,
    Recording,
}

/// The per-session state machine.
///
/// One `CallSession` exists per inbound stream and exclusively owns its
/// recording sink; nothing here is shared across sessions. `run` consumes
/// the session, so teardown happens exactly once no matter which transition
/// ends the call, and the sink additionally finalizes itself on drop.
pub struct CallSession {
    base_dir: PathBuf,
    profile: AudioProfile,
    policy: SessionPolicy,
    state: State,
    call_id: String,
    sink: Option<RecordingSink>,
    recording_path: Option<PathBuf>,
    bytes_written: u64,
    chunks_accepted: u64,
    chunks_dropped: u64,
    /// Server-assigned sequence for outbound chunks
    sequence: u64,
}

impl CallSession {
    pub fn new(base_dir: impl Into<PathBuf>, profile: AudioProfile, policy: SessionPolicy) -> Self {
        Self {
            base_dir: base_dir.into(),
            profile,
            policy,
            state: State::AwaitingStart,
            call_id: UNKNOWN_CALL_ID.to_string(),
            sink: None,
            recording_path: None,
            bytes_written: 0,
            chunks_accepted: 0,
            chunks_dropped: 0,
            sequence: 0,
        }
    }

    /// Drive the session until the stream ends, the client disconnects, the
    /// idle window elapses, or the sink fails.
    ///
    /// Inbound consumption and outbound emission are sequential: each
    /// accepted chunk is echoed on `outbound` before the next message is
    /// read, so ordering is inherent and nothing buffers the whole call.
    pub async fn run(
        mut self,
        mut inbound: mpsc::Receiver<ClientMessage>,
        outbound: mpsc::Sender<ServerMessage>,
    ) -> SessionStats {
        info!("new call session started");
        let outcome = self.dispatch(&mut inbound, &outbound).await;
        self.finish(outcome)
    }

    async fn dispatch(
        &mut self,
        inbound: &mut mpsc::Receiver<ClientMessage>,
        outbound: &mpsc::Sender<ServerMessage>,
    ) -> SessionOutcome {
        loop {
            let next = match self.policy.idle_timeout {
                Some(limit) => match timeout(limit, inbound.recv()).await {
                    Ok(next) => next,
                    Err(_) => {
                        warn!(call_id = %self.call_id, "session idle for {:?}, terminating", limit);
                        return SessionOutcome::IdleTimeout;
                    }
                },
                None => inbound.recv().await,
            };

            let Some(message) = next else {
                info!(call_id = %self.call_id, "inbound stream closed by peer");
                return SessionOutcome::StreamClosed;
            };

            if !message.status {
                debug!(call_id = %self.call_id, "ignoring status=false message");
                continue;
            }

            match message.payload {
                Some(ClientPayload::InitialInfo(info)) => {
                    if let Err(e) = self.handle_start(info) {
                        error!(call_id = %self.call_id, "failed to open recording sink: {:#}", e);
                        return SessionOutcome::ResourceError;
                    }
                }
                Some(ClientPayload::AudioChunk(chunk)) => {
                    match self.handle_chunk(chunk) {
                        Ok(Some(response)) => {
                            if let Some(delay) = self.policy.response_delay {
                                tokio::time::sleep(delay).await;
                            }
                            if outbound.send(response).await.is_err() {
                                info!(call_id = %self.call_id, "outbound stream closed by peer");
                                return SessionOutcome::StreamClosed;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            error!(call_id = %self.call_id, "recording sink failed: {:#}", e);
                            return SessionOutcome::ResourceError;
                        }
                    }
                }
                Some(ClientPayload::Disconnect) => {
                    info!(call_id = %self.call_id, "client requested disconnect");
                    return SessionOutcome::Disconnected;
                }
                // Unrecognized/empty payload: no side effect
                None => {}
            }
        }
    }

    fn handle_start(&mut self, info: InitialInfo) -> Result<()> {
        if self.state == State::Recording {
            warn!(call_id = %self.call_id, "duplicate start message ignored");
            return Ok(());
        }

        if !info.call_id.is_empty() {
            self.call_id = info.call_id;
        }
        info!(
            call_id = %self.call_id,
            phone = %info.customer_phone_number,
            "call started"
        );
        self.open_sink()
    }

    fn open_sink(&mut self) -> Result<()> {
        let sink = RecordingSink::create(&self.base_dir, &self.call_id, self.profile)?;
        self.recording_path = Some(sink.path().to_path_buf());
        self.sink = Some(sink);
        self.state = State::Recording;
        Ok(())
    }

    /// Returns the echo for an accepted chunk, `None` for a dropped one.
    fn handle_chunk(&mut self, chunk: AudioChunk) -> Result<Option<ServerMessage>> {
        if self.state == State::AwaitingStart {
            if self.policy.require_start_message {
                warn!(call_id = %self.call_id, "audio chunk before session start, dropping");
                self.chunks_dropped += 1;
                return Ok(None);
            }
            // Variant without a start message: open on first chunk
            self.call_id = format!("call-{}", uuid::Uuid::new_v4());
            self.open_sink()?;
        }

        let Some(sink) = self.sink.as_mut() else {
            warn!(call_id = %self.call_id, "audio chunk with no open sink, dropping");
            self.chunks_dropped += 1;
            return Ok(None);
        };

        let written = sink.append(&chunk.audio_content)?;
        self.bytes_written += written as u64;
        self.chunks_accepted += 1;

        let response = ServerMessage {
            status: true,
            chunk: echo_chunk(&chunk, self.sequence, self.policy.annotation.as_deref()),
        };
        self.sequence += 1;
        Ok(Some(response))
    }

    /// Guaranteed teardown: close the sink if it is open and report how the
    /// session ended. Runs exactly once, on every exit path.
    fn finish(mut self, outcome: SessionOutcome) -> SessionStats {
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.finish() {
                error!(call_id = %self.call_id, "failed to finalize recording: {:#}", e);
            }
        }

        match outcome {
            SessionOutcome::ResourceError => error!(
                call_id = %self.call_id,
                bytes = self.bytes_written,
                "call session terminated by resource error"
            ),
            _ => info!(
                call_id = %self.call_id,
                bytes = self.bytes_written,
                accepted = self.chunks_accepted,
                dropped = self.chunks_dropped,
                outcome = ?outcome,
                "call session finished"
            ),
        }

        SessionStats {
            call_id: self.call_id,
            outcome,
            bytes_written: self.bytes_written,
            chunks_accepted: self.chunks_accepted,
            chunks_dropped: self.chunks_dropped,
            recording_path: self.recording_path,
            finished_at: Utc::now(),
        }
    }
}
