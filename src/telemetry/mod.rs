//! Session telemetry for the gesture engine.
//!
//! Counters describing what the engine did with a frame stream, exposed to
//! the CLI and persisted across sessions.

pub mod log;

// Re-export commonly used types
pub use log::{
    create_shared_log, create_shared_log_with_persistence, SessionLog, SessionStats,
    SharedSessionLog,
};
