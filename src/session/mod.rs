//! Call session management
//!
//! This module provides the per-session streaming state machine:
//! - `CallSession` consumes inbound client messages and drives
//!   `AwaitingStart -> Recording -> Terminated`
//! - the recording sink is opened exactly once and closed exactly once
//! - every accepted chunk is echoed as exactly one outbound message,
//!   in arrival order
//! - `SessionPolicy` selects between the two protocol variants

mod dispatcher;
mod echo;
mod policy;
mod stats;

pub use dispatcher::CallSession;
pub use echo::echo_chunk;
pub use policy::SessionPolicy;
pub use stats::{SessionOutcome, SessionStats};
