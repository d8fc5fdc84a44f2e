//! Per-call recording sink
//!
//! One WAV file per session, opened lazily, written append-only, and
//! finalized exactly once on teardown.

mod sink;

pub use sink::RecordingSink;
