//! Frame-level observation types produced by the gesture-classification
//! oracle.
//!
//! The classifier itself (camera, model, annotation) is an external
//! collaborator; this module only defines the shape of its per-frame output
//! and the rule that turns a frame into tracker appends.

use crate::core::run::{HandMask, EMPTY_LABEL};
use serde::{Deserialize, Serialize};

/// Physical hand reported by the classifier for a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Right,
    Left,
}

impl Hand {
    /// The observed mask for a single-hand detection.
    pub fn mask(self) -> HandMask {
        match self {
            Hand::Right => HandMask::Right,
            Hand::Left => HandMask::Left,
        }
    }
}

/// One hand's classification within a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandDetection {
    /// Classified gesture label.
    pub label: String,
    /// Classifier confidence, 0.0 to 1.0. Carried for display only; the
    /// engine ignores it.
    pub score: f64,
    /// Which hand produced the detection.
    pub hand: Hand,
}

/// The classifier's output for one processed video frame: up to two
/// simultaneous hand detections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameObservation {
    /// Milliseconds since the first frame, monotonically non-decreasing.
    pub timestamp_ms: u64,
    pub detections: Vec<HandDetection>,
}

impl FrameObservation {
    pub fn new(timestamp_ms: u64, detections: Vec<HandDetection>) -> Self {
        Self {
            timestamp_ms,
            detections,
        }
    }

    /// A frame with no hands detected.
    pub fn empty(timestamp_ms: u64) -> Self {
        Self::new(timestamp_ms, Vec::new())
    }
}

/// Translate a frame into `(label, observed_mask)` tracker appends.
///
/// - Zero hands: one empty-label append with the `Both` mask, so the aging
///   clock keeps advancing during idle frames.
/// - One hand: one append with that hand's mask.
/// - Two hands of differing handedness reporting the SAME label: a single
///   append with the `Both` mask, never two.
/// - Two hands reporting different labels: one append per hand, each with
///   its own mask. (Two detections of the same hand, which the oracle
///   should not produce, degrade to this per-hand case.)
pub fn appends_for_frame(frame: &FrameObservation) -> Vec<(String, HandMask)> {
    match frame.detections.as_slice() {
        [] => vec![(EMPTY_LABEL.to_string(), HandMask::Both)],
        [single] => vec![(single.label.clone(), single.hand.mask())],
        [first, second] if first.hand != second.hand && first.label == second.label => {
            vec![(first.label.clone(), HandMask::Both)]
        }
        detections => detections
            .iter()
            .map(|d| (d.label.clone(), d.hand.mask()))
            .collect(),
    }
}
