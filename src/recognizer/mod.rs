//! Frame ingestion for the gesture engine.
//!
//! The gesture-classification model is an external oracle; this module
//! defines its per-frame output contract, the multi-hand disambiguation
//! rule, and a replay source that stands in for the live camera pipeline.

pub mod replay;
pub mod types;

pub use replay::{ReplayError, ReplayInput, ReplaySource};
pub use types::{appends_for_frame, FrameObservation, Hand, HandDetection};
