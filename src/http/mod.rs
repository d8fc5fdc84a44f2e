//! HTTP transport for the call service
//!
//! Two routes:
//! - GET /health - stateless readiness probe, always SERVING
//! - GET /call - WebSocket upgrade carrying one duplex call stream;
//!   one socket is one session is one worker task
//!
//! Session concurrency is bounded by a semaphore; connections beyond the
//! pool size are rejected with 503.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
