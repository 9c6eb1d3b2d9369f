//! Handwave - temporal gesture-sequence matching engine.
//!
//! This library turns a noisy, per-frame stream of hand-gesture
//! classifications into reliable "pattern completed" signals: hold gesture
//! X for at least D milliseconds, optionally with a specific hand, possibly
//! as one step of an ordered sequence, and fire a bound action when the
//! whole pattern is satisfied.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Handwave                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │ Recognizer  │──▶│   Tracker   │──▶│  Dispatch   │        │
//! │  │  (frames)   │   │ (run ring)  │   │ (bindings)  │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │         │                                    │              │
//! │         ▼                                    ▼              │
//! │  ┌─────────────┐                     ┌─────────────┐        │
//! │  │  Telemetry  │                     │ Action sink │        │
//! │  │     Log     │                     │ (external)  │        │
//! │  └─────────────┘                     └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The classifier model, camera pipeline, and the automation client that
//! executes actions are external collaborators: frames come in as
//! [`recognizer::FrameObservation`] values and matched actions go out
//! through the [`actions::ActionSink`] seam.
//!
//! # Example
//!
//! ```
//! use handwave::core::{Engine, GestureBindings, GestureSequence, GestureTracker, HandMask};
//! use handwave::config::Config;
//!
//! let config = Config::default();
//! let tracker = GestureTracker::new(config.tracker_config());
//! let mut bindings = GestureBindings::new(config.vocabulary_set());
//! bindings
//!     .register(
//!         "pause",
//!         GestureSequence::from_steps([("Victory", 1_000u64, HandMask::Either)]),
//!     )
//!     .expect("valid pattern");
//! let mut engine = Engine::new(tracker, bindings);
//!
//! engine.process_event("Victory", HandMask::Right, 0).unwrap();
//! let fired = engine.process_event("Victory", HandMask::Right, 1_200).unwrap();
//! assert_eq!(fired.as_deref(), Some("pause"));
//! ```

pub mod actions;
pub mod config;
pub mod core;
pub mod recognizer;
pub mod telemetry;

// Re-export key types at crate root for convenience
pub use actions::{ActionError, ActionSink, PrintSink};
pub use config::{BindingConfig, Config, ConfigError, StepConfig};
pub use core::{
    DispatchError, Engine, GestureBindings, GestureRun, GestureSequence, GestureTracker, HandMask,
    TrackerConfig, TrackerError, EMPTY_LABEL,
};
pub use recognizer::{FrameObservation, Hand, HandDetection, ReplayInput, ReplaySource};
pub use telemetry::{SessionLog, SessionStats, SharedSessionLog};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
