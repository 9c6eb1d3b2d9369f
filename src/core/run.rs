//! Leaf value types for the gesture engine: handedness masks and runs.
//!
//! A "run" is a maximal contiguous stretch of the event stream during which
//! the classified gesture label did not change. Runs are what the tracker
//! stores and what target patterns are made of.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label emitted by the classifier when no gesture (or no hand) is present.
///
/// Also used for the placeholder run the tracker inserts when a threshold
/// collapse would otherwise leave the window empty.
pub const EMPTY_LABEL: &str = "None";

/// 2-bit handedness mask: independent bits for right and left hand.
///
/// Used in two roles. On an observed event it records which physical hand(s)
/// produced the label. On a pattern step it records what the matching run's
/// mask is required to satisfy — see [`HandMask::satisfied_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandMask {
    /// No specific hand required. As a requirement this means "any single
    /// hand" — it is NOT satisfied by both hands at once.
    Either = 0,
    /// Right hand only.
    Right = 1,
    /// Left hand only.
    Left = 2,
    /// Both hands simultaneously.
    Both = 3,
}

impl HandMask {
    /// Compatibility test with `self` as the required mask and `observed`
    /// as the mask recorded on an appended event.
    ///
    /// | required | satisfied by observed            |
    /// |----------|----------------------------------|
    /// | Either   | anything but Both (a single hand)|
    /// | Right    | Right only                       |
    /// | Left     | Left only                        |
    /// | Both     | Both only                        |
    pub fn satisfied_by(self, observed: HandMask) -> bool {
        match self {
            HandMask::Either => observed != HandMask::Both,
            required => required == observed,
        }
    }

    /// Raw 2-bit value (right bit 0, left bit 1).
    pub fn bits(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for HandMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandMask::Either => "either",
            HandMask::Right => "right",
            HandMask::Left => "left",
            HandMask::Both => "both",
        };
        write!(f, "{name}")
    }
}

/// A single merged occurrence of one gesture label.
///
/// The mask is fixed when the run is created; extending a run only ever
/// accumulates duration, it never merges differing masks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureRun {
    /// Classified gesture label (must belong to the tracker's vocabulary).
    pub label: String,
    /// Accumulated duration of this run in milliseconds.
    pub duration_ms: u64,
    /// Handedness observed when the run was created (or required, on a
    /// pattern step).
    pub hands: HandMask,
}

impl GestureRun {
    /// Create a run with the given label, duration and mask.
    pub fn new(label: impl Into<String>, duration_ms: u64, hands: HandMask) -> Self {
        Self {
            label: label.into(),
            duration_ms,
            hands,
        }
    }

    /// The placeholder run inserted when a threshold collapse would leave
    /// the window empty: empty label, duration pinned to the minimum.
    pub fn placeholder(min_duration_ms: u64) -> Self {
        Self::new(EMPTY_LABEL, min_duration_ms, HandMask::Either)
    }
}

impl fmt::Display for GestureRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}ms,{}]", self.label, self.duration_ms, self.hands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_either_requires_a_single_hand() {
        assert!(HandMask::Either.satisfied_by(HandMask::Right));
        assert!(HandMask::Either.satisfied_by(HandMask::Left));
        // An unattributed single-hand observation also counts.
        assert!(HandMask::Either.satisfied_by(HandMask::Either));
        // Two hands at once never satisfy a single-hand requirement.
        assert!(!HandMask::Either.satisfied_by(HandMask::Both));
    }

    #[test]
    fn test_specific_hands_require_exact_match() {
        assert!(HandMask::Right.satisfied_by(HandMask::Right));
        assert!(!HandMask::Right.satisfied_by(HandMask::Left));
        assert!(!HandMask::Right.satisfied_by(HandMask::Both));

        assert!(HandMask::Left.satisfied_by(HandMask::Left));
        assert!(!HandMask::Left.satisfied_by(HandMask::Right));
        assert!(!HandMask::Left.satisfied_by(HandMask::Both));

        assert!(HandMask::Both.satisfied_by(HandMask::Both));
        assert!(!HandMask::Both.satisfied_by(HandMask::Right));
        assert!(!HandMask::Both.satisfied_by(HandMask::Left));
    }

    #[test]
    fn test_mask_bits() {
        assert_eq!(HandMask::Either.bits(), 0);
        assert_eq!(HandMask::Right.bits(), 1);
        assert_eq!(HandMask::Left.bits(), 2);
        assert_eq!(HandMask::Both.bits(), 3);
    }

    #[test]
    fn test_placeholder_run() {
        let run = GestureRun::placeholder(750);
        assert_eq!(run.label, EMPTY_LABEL);
        assert_eq!(run.duration_ms, 750);
        assert_eq!(run.hands, HandMask::Either);
    }

    #[test]
    fn test_mask_serde_names() {
        let json = serde_json::to_string(&HandMask::Both).unwrap();
        assert_eq!(json, "\"both\"");
        let mask: HandMask = serde_json::from_str("\"either\"").unwrap();
        assert_eq!(mask, HandMask::Either);
    }
}
