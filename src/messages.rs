//! Wire shapes for the duplex call stream.
//!
//! One `ClientMessage` per inbound frame, one `ServerMessage` per echoed
//! chunk. PCM payloads travel base64-encoded so the frames stay valid JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One frame from the client side of the stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMessage {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ClientPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientPayload {
    InitialInfo(InitialInfo),
    AudioChunk(AudioChunk),
    Disconnect,
}

/// Call metadata sent once at session start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialInfo {
    pub call_id: String,
    #[serde(default)]
    pub customer_phone_number: String,
}

/// One discrete unit of inbound audio with its format metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioChunk {
    pub sample_rate: u32,
    /// Bytes per sample
    pub sample_width: u16,
    pub num_channels: u16,
    pub duration: f64,
    #[serde(with = "pcm_base64")]
    pub audio_content: Vec<u8>,
    #[serde(default)]
    pub sequence: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// One frame from the server side of the stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerMessage {
    pub status: bool,
    pub chunk: EchoChunk,
}

/// An echoed audio chunk.
///
/// `sequence` is the server's own counter, not the client's. `timestamp`
/// carries the inbound timestamp verbatim when one was supplied, and
/// `message` carries the fixed annotation when the annotating policy is on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoChunk {
    pub sample_rate: u32,
    pub sample_width: u16,
    pub num_channels: u16,
    pub duration: f64,
    #[serde(with = "pcm_base64")]
    pub audio_content: Vec<u8>,
    pub sequence: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ClientMessage {
    pub fn start(call_id: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            status: true,
            payload: Some(ClientPayload::InitialInfo(InitialInfo {
                call_id: call_id.into(),
                customer_phone_number: phone.into(),
            })),
        }
    }

    pub fn audio(chunk: AudioChunk) -> Self {
        Self {
            status: true,
            payload: Some(ClientPayload::AudioChunk(chunk)),
        }
    }

    pub fn disconnect() -> Self {
        Self {
            status: true,
            payload: Some(ClientPayload::Disconnect),
        }
    }
}

/// Serde codec for raw PCM bytes as base64 text.
mod pcm_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
