//! Core of the gesture engine.
//!
//! This module contains:
//! - Run and handedness-mask value types
//! - Sequence containment and the significance filter
//! - The bounded, time-decayed gesture tracker
//! - Action bindings and the per-frame dispatch loop

pub mod dispatch;
pub mod run;
pub mod sequence;
pub mod tracker;

// Re-export commonly used types
pub use dispatch::{DispatchError, Engine, GestureBindings};
pub use run::{GestureRun, HandMask, EMPTY_LABEL};
pub use sequence::{filter_by_threshold, GestureSequence};
pub use tracker::{GestureTracker, TrackerConfig, TrackerError};
