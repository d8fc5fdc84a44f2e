use std::time::Duration;

/// Behavior knobs for one call session.
///
/// The two deployed protocol variants are the same machine under different
/// settings: one opens the sink on an explicit start message and echoes
/// plain chunks, the other opens on the first audio chunk and annotates
/// every echo.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// When false, the sink opens lazily on the first audio chunk with a
    /// generated call ID instead of waiting for a start message
    pub require_start_message: bool,

    /// Fixed annotation attached to every echoed chunk
    pub annotation: Option<String>,

    /// Artificial delay before each outbound message
    pub response_delay: Option<Duration>,

    /// Terminate a session that goes this long without any inbound message
    pub idle_timeout: Option<Duration>,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            require_start_message: true,
            annotation: None,
            response_delay: None,
            idle_timeout: None,
        }
    }
}
