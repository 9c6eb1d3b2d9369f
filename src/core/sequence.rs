//! Ordered run sequences: the tracker's live window view and the caller's
//! registered target patterns.
//!
//! Both roles share one type. A sequence carries a derived set of distinct
//! labels so containment can cheaply reject slices that cannot match before
//! comparing element-wise.

use crate::core::run::{GestureRun, HandMask};
use std::collections::HashSet;

/// An ordered sequence of gesture runs, oldest first.
#[derive(Debug, Clone, Default)]
pub struct GestureSequence {
    runs: Vec<GestureRun>,
    /// Distinct labels appearing in `runs`, maintained on every mutation.
    label_set: HashSet<String>,
}

impl GestureSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequence from a list of runs.
    pub fn from_runs(runs: Vec<GestureRun>) -> Self {
        let label_set = runs.iter().map(|r| r.label.clone()).collect();
        Self { runs, label_set }
    }

    /// Convenience constructor for target patterns:
    /// `(label, minimum_duration_ms, required_handedness)` steps.
    pub fn from_steps<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = (S, u64, HandMask)>,
        S: Into<String>,
    {
        Self::from_runs(
            steps
                .into_iter()
                .map(|(label, duration_ms, hands)| GestureRun::new(label, duration_ms, hands))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The runs in order, oldest first.
    pub fn runs(&self) -> &[GestureRun] {
        &self.runs
    }

    /// Distinct labels appearing in this sequence.
    pub fn label_set(&self) -> &HashSet<String> {
        &self.label_set
    }

    /// Append a run, keeping the label set current.
    pub fn push(&mut self, run: GestureRun) {
        self.label_set.insert(run.label.clone());
        self.runs.push(run);
    }

    /// Exact match against a target pattern: same length, aligned at offset
    /// 0, and per-pair the labels are equal, this sequence's duration meets
    /// the target's minimum, and the masks are strictly equal.
    ///
    /// Unlike [`contains`](Self::contains), strict-equals does NOT apply the
    /// `Either` handedness relaxation. The two operators are deliberately
    /// distinct.
    pub fn equals(&self, target: &GestureSequence) -> bool {
        if self.len() != target.len() || self.label_set != target.label_set {
            return false;
        }
        self.runs
            .iter()
            .zip(target.runs.iter())
            .all(|(w, t)| w.label == t.label && w.duration_ms >= t.duration_ms && w.hands == t.hands)
    }

    /// Subsequence containment: does some contiguous slice of this sequence
    /// satisfy `target`?
    ///
    /// Offsets are scanned oldest-to-newest, so the earliest valid alignment
    /// wins. A slice is fast-rejected when its distinct-label set differs
    /// from the target's; otherwise each pair must agree on label, meet the
    /// target's minimum duration, and satisfy the target's handedness
    /// requirement (`Either` accepts any single hand, never both at once).
    pub fn contains(&self, target: &GestureSequence) -> bool {
        if target.len() > self.len() {
            return false;
        }
        let spare = self.len() - target.len();
        for offset in 0..=spare {
            let slice = &self.runs[offset..offset + target.len()];
            if !target.label_set_matches(slice) {
                continue;
            }
            let all_satisfied = slice.iter().zip(target.runs.iter()).all(|(w, t)| {
                w.label == t.label
                    && w.duration_ms >= t.duration_ms
                    && t.hands.satisfied_by(w.hands)
            });
            if all_satisfied {
                return true;
            }
        }
        false
    }

    /// Check that a slice's distinct labels are exactly this sequence's
    /// label set.
    fn label_set_matches(&self, slice: &[GestureRun]) -> bool {
        slice.iter().all(|r| self.label_set.contains(&r.label))
            && self
                .label_set
                .iter()
                .all(|l| slice.iter().any(|r| &r.label == l))
    }
}

/// Keep only runs whose duration meets `min_duration_ms`, preserving order.
///
/// Pure and stateless: both the tracker's [`sequence_view`] and its capacity
/// collapse go through this, so the "lazy" significance filter is a single
/// explicit call rather than a side effect of read timing.
///
/// [`sequence_view`]: crate::core::tracker::GestureTracker::sequence_view
pub fn filter_by_threshold(runs: &[GestureRun], min_duration_ms: u64) -> Vec<GestureRun> {
    runs.iter()
        .filter(|r| r.duration_ms >= min_duration_ms)
        .cloned()
        .collect()
}
