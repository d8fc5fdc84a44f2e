use crate::messages::{AudioChunk, EchoChunk};

/// Build the echo for one accepted inbound chunk.
///
/// Audio bytes and format metadata pass through unchanged. `sequence` is
/// the server's own monotone counter; the inbound timestamp is preserved
/// verbatim and `annotation` is attached when the policy supplies one.
pub fn echo_chunk(inbound: &AudioChunk, sequence: u64, annotation: Option<&str>) -> EchoChunk {
    EchoChunk {
        sample_rate: inbound.sample_rate,
        sample_width: inbound.sample_width,
        num_channels: inbound.num_channels,
        duration: inbound.duration,
        audio_content: inbound.audio_content.clone(),
        sequence,
        timestamp: inbound.timestamp,
        message: annotation.map(str::to_owned),
    }
}
