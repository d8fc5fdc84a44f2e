pub mod audio;
pub mod config;
pub mod http;
pub mod messages;
pub mod recording;
pub mod session;

pub use audio::{AudioFile, AudioProfile};
pub use config::Config;
pub use http::{create_router, AppState};
pub use messages::{
    AudioChunk, ClientMessage, ClientPayload, EchoChunk, InitialInfo, ServerMessage,
};
pub use recording::RecordingSink;
pub use session::{echo_chunk, CallSession, SessionOutcome, SessionPolicy, SessionStats};
