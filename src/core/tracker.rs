//! The stateful tracking engine: merges classified gesture events into runs
//! and maintains a bounded, time-decayed window of them.
//!
//! The window is a raw ring of runs. Significance filtering (the minimum
//! duration) is deliberately deferred: short misclassifications are allowed
//! to sit in the ring and merge with a later identical observation before
//! the threshold is ever enforced, which absorbs single-frame noise without
//! a separate debounce stage. External code only ever sees the filtered
//! [`sequence_view`](GestureTracker::sequence_view).

use crate::core::run::{GestureRun, HandMask};
use crate::core::sequence::{filter_by_threshold, GestureSequence};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;

/// Tracker construction parameters.
///
/// The vocabulary is an owned copy: each tracker validates against its own
/// set, there is no process-wide gesture registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Minimum duration for a run to be considered significant.
    pub min_duration_ms: u64,
    /// Maximum number of runs retained in the window.
    pub max_window_len: usize,
    /// Maximum cumulative age of a run before it is evicted.
    pub max_history_age_ms: u64,
    /// Recognized gesture labels.
    pub vocabulary: HashSet<String>,
}

/// Errors raised by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// The appended label is outside the tracker's vocabulary.
    InvalidLabel(String),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::InvalidLabel(label) => {
                write!(f, "{label:?} is not a recognized gesture label")
            }
        }
    }
}

impl std::error::Error for TrackerError {}

/// Stateful gesture-run tracker.
///
/// All calls must be serialized by the owner; the tracker performs no I/O
/// and no operation blocks, but it is not internally synchronized.
pub struct GestureTracker {
    config: TrackerConfig,
    /// Live window of runs, oldest first. Bounded to `max_window_len`.
    window: VecDeque<GestureRun>,
    /// Timestamp of the most recent appended event, ms.
    last_timestamp_ms: u64,
}

impl GestureTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let capacity = config.max_window_len.max(1);
        Self {
            config,
            window: VecDeque::with_capacity(capacity),
            last_timestamp_ms: 0,
        }
    }

    /// Number of runs currently in the raw window (including runs below the
    /// significance threshold).
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Consume one classification event.
    ///
    /// Timestamps are milliseconds relative to the first frame and must be
    /// monotonically non-decreasing. Elapsed time always accrues to the
    /// previous run — a run's duration measures how long its label held, not
    /// how long until the next sample arrived.
    pub fn append(
        &mut self,
        label: &str,
        observed: HandMask,
        timestamp_ms: u64,
    ) -> Result<(), TrackerError> {
        if !self.config.vocabulary.contains(label) {
            return Err(TrackerError::InvalidLabel(label.to_string()));
        }

        // Aging runs first, even when the label repeats.
        self.evict_aged(timestamp_ms);

        if self.window.is_empty() {
            self.window.push_back(GestureRun::new(label, 0, observed));
            self.last_timestamp_ms = timestamp_ms;
            return Ok(());
        }

        if self.window.len() >= self.config.max_window_len {
            self.collapse_by_threshold();
        }

        let elapsed = timestamp_ms.saturating_sub(self.last_timestamp_ms);
        if let Some(last) = self.window.back_mut() {
            last.duration_ms += elapsed;
        }
        self.last_timestamp_ms = timestamp_ms;

        let label_changed = self
            .window
            .back()
            .map(|last| last.label != label)
            .unwrap_or(true);
        if label_changed {
            if self.window.len() >= self.config.max_window_len {
                // Collapse freed nothing; the ring drops its oldest entry.
                self.window.pop_front();
            }
            self.window.push_back(GestureRun::new(label, 0, observed));
        }
        Ok(())
    }

    /// Empty the window unconditionally.
    ///
    /// Implemented by forcing the aging pass with a synthetic timestamp far
    /// enough ahead that every run's age exceeds the history budget.
    pub fn clear_queue(&mut self) {
        let synthetic = self
            .last_timestamp_ms
            .saturating_add(self.config.max_history_age_ms)
            .saturating_add(1);
        self.evict_aged(synthetic);
    }

    /// The filtered, read-only view of the window: only runs meeting the
    /// significance threshold, in order. This is the sole sanctioned way to
    /// observe tracker state; the raw ring may hold sub-threshold runs.
    pub fn sequence_view(&self) -> GestureSequence {
        let runs: Vec<GestureRun> = self.window.iter().cloned().collect();
        GestureSequence::from_runs(filter_by_threshold(&runs, self.config.min_duration_ms))
    }

    /// Evict runs whose age exceeds the history budget.
    ///
    /// A run's age is the sum of its own duration and every newer run's,
    /// plus the time elapsed since the last recorded event. Ages are
    /// monotone non-increasing toward the newest run, so the scan stops at
    /// the first survivor.
    fn evict_aged(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.last_timestamp_ms);
        let mut remaining: u64 = self.window.iter().map(|r| r.duration_ms).sum();
        while let Some(oldest) = self.window.front() {
            let age = remaining.saturating_add(elapsed);
            if age > self.config.max_history_age_ms {
                remaining -= oldest.duration_ms;
                self.window.pop_front();
            } else {
                break;
            }
        }
    }

    /// Free capacity when the window is full: rotate every run through the
    /// significance filter, dropping the ones below threshold.
    ///
    /// This re-validates older entries as well as evicting short ones. If
    /// the pass would leave the window empty because the newest run is
    /// itself short, that run is replaced by the empty-label placeholder so
    /// the subsequent append always has a last run to extend.
    fn collapse_by_threshold(&mut self) {
        let newest = self.window.pop_back();
        let kept: Vec<GestureRun> = {
            let (a, b) = self.window.as_slices();
            let mut runs = Vec::with_capacity(self.window.len());
            runs.extend_from_slice(a);
            runs.extend_from_slice(b);
            filter_by_threshold(&runs, self.config.min_duration_ms)
        };
        self.window = kept.into();
        match newest {
            Some(run) if run.duration_ms >= self.config.min_duration_ms => {
                self.window.push_back(run);
            }
            Some(_) if self.window.is_empty() => {
                self.window
                    .push_back(GestureRun::placeholder(self.config.min_duration_ms));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::run::{HandMask::*, EMPTY_LABEL};
    use crate::core::sequence::GestureSequence;

    fn vocabulary() -> HashSet<String> {
        [
            "None",
            "Closed_Fist",
            "Open_Palm",
            "Pointing_Up",
            "Thumb_Down",
            "Thumb_Up",
            "Victory",
            "ILoveYou",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn tracker(min: u64, len: usize, age: u64) -> GestureTracker {
        GestureTracker::new(TrackerConfig {
            min_duration_ms: min,
            max_window_len: len,
            max_history_age_ms: age,
            vocabulary: vocabulary(),
        })
    }

    #[test]
    fn test_invalid_label_rejected_without_side_effects() {
        let mut t = tracker(750, 4, 10_000);
        t.append("Open_Palm", Right, 0).unwrap();
        let err = t.append("Wave_Hello", Right, 100).unwrap_err();
        assert_eq!(err, TrackerError::InvalidLabel("Wave_Hello".to_string()));
        // The bad frame left the window untouched.
        assert_eq!(t.len(), 1);
        t.append("Open_Palm", Right, 800).unwrap();
        assert_eq!(t.sequence_view().runs()[0].duration_ms, 800);
    }

    #[test]
    fn test_merge_idempotence() {
        // Repeating one label N times yields exactly one run holding the
        // whole elapsed time.
        let mut t = tracker(750, 4, 60_000);
        for i in 0..10u64 {
            t.append("Open_Palm", Right, i * 100).unwrap();
        }
        assert_eq!(t.len(), 1);
        let view = t.sequence_view();
        assert_eq!(view.len(), 1);
        assert_eq!(view.runs()[0].duration_ms, 900);
        assert_eq!(view.runs()[0].hands, Right);
    }

    #[test]
    fn test_duration_accrues_to_previous_run() {
        let mut t = tracker(100, 4, 60_000);
        t.append("Open_Palm", Right, 0).unwrap();
        t.append("Victory", Right, 400).unwrap();
        // The 400ms belong to Open_Palm; Victory starts at zero.
        let view = t.sequence_view();
        assert_eq!(view.len(), 1);
        assert_eq!(view.runs()[0].label, "Open_Palm");
        assert_eq!(view.runs()[0].duration_ms, 400);
    }

    #[test]
    fn test_sub_threshold_runs_hidden_from_view() {
        let mut t = tracker(750, 4, 60_000);
        t.append("Open_Palm", Right, 0).unwrap();
        t.append("Victory", Right, 800).unwrap();
        t.append("None", Both, 900).unwrap();
        // Victory held for only 100ms: in the raw window, not in the view.
        assert_eq!(t.len(), 3);
        let view = t.sequence_view();
        assert_eq!(view.len(), 1);
        assert_eq!(view.runs()[0].label, "Open_Palm");
    }

    #[test]
    fn test_noise_merges_before_threshold_applies() {
        // A one-frame blip of the same label later merges back into a run
        // that ultimately clears the threshold.
        let mut t = tracker(750, 4, 60_000);
        t.append("Thumb_Up", Right, 0).unwrap();
        t.append("Thumb_Up", Right, 300).unwrap();
        t.append("Thumb_Up", Right, 900).unwrap();
        let view = t.sequence_view();
        assert_eq!(view.len(), 1);
        assert_eq!(view.runs()[0].duration_ms, 900);
    }

    #[test]
    fn test_aging_evicts_stale_runs() {
        let mut t = tracker(100, 8, 2_800);
        t.append("Open_Palm", Right, 0).unwrap();
        t.append("Victory", Right, 500).unwrap();
        t.append("Victory", Right, 1_000).unwrap();
        assert_eq!(t.len(), 2);
        // At t=3_000 Open_Palm's age is its 500ms + Victory's 500ms + the
        // 2_000ms elapsed = 3_000, over budget. Victory's age is 2_500 and
        // it survives.
        t.append("Victory", Right, 3_000).unwrap();
        assert_eq!(t.len(), 1);
        let view = t.sequence_view();
        assert_eq!(view.runs()[0].label, "Victory");
        assert_eq!(view.runs()[0].duration_ms, 2_500);
    }

    #[test]
    fn test_aging_runs_even_on_label_repeat() {
        let mut t = tracker(100, 8, 1_000);
        t.append("Open_Palm", Right, 0).unwrap();
        t.append("Open_Palm", Right, 500).unwrap();
        // Same label, but the gap pushes the run past the age budget; the
        // old run must go and a fresh one takes its place.
        t.append("Open_Palm", Right, 5_000).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.sequence_view().len(), 0);
    }

    #[test]
    fn test_clear_queue_empties_window() {
        let mut t = tracker(100, 4, 60_000);
        t.append("Open_Palm", Right, 0).unwrap();
        t.append("Victory", Left, 500).unwrap();
        assert!(!t.is_empty());
        t.clear_queue();
        assert!(t.is_empty());
        assert_eq!(t.sequence_view().len(), 0);
    }

    #[test]
    fn test_capacity_collapse_drops_short_runs() {
        let mut t = tracker(750, 3, 60_000);
        t.append("Open_Palm", Right, 0).unwrap();
        t.append("Victory", Right, 800).unwrap(); // Open_Palm: 800
        t.append("Thumb_Up", Right, 900).unwrap(); // Victory: 100 (short)
        assert_eq!(t.len(), 3);
        // Full window: the collapse re-validates the ring. The short
        // Victory run and the not-yet-extended Thumb_Up run are dropped,
        // so the elapsed 900ms accrue to Open_Palm and the repeated label
        // starts a fresh run.
        t.append("Thumb_Up", Right, 1_800).unwrap();
        assert_eq!(t.len(), 2);
        let view = t.sequence_view();
        assert_eq!(view.len(), 1);
        assert_eq!(view.runs()[0].label, "Open_Palm");
        assert_eq!(view.runs()[0].duration_ms, 1_700);
    }

    #[test]
    fn test_collapse_preserves_order_of_survivors() {
        let mut t = tracker(500, 3, 60_000);
        t.append("Open_Palm", Right, 0).unwrap();
        t.append("Victory", Left, 600).unwrap(); // Open_Palm: 600
        t.append("Thumb_Up", Right, 1_300).unwrap(); // Victory: 700
        // Collapse keeps Open_Palm and Victory in order; the zero-duration
        // Thumb_Up run is evicted and Victory absorbs the elapsed time.
        t.append("Closed_Fist", Right, 2_000).unwrap();
        let view = t.sequence_view();
        let labels: Vec<&str> = view
            .runs()
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Open_Palm", "Victory"]);
    }

    #[test]
    fn test_collapse_placeholder_when_all_runs_short() {
        let mut t = tracker(750, 2, 60_000);
        t.append("Open_Palm", Right, 0).unwrap();
        t.append("Victory", Right, 100).unwrap(); // Open_Palm: 100 (short)
        assert_eq!(t.len(), 2);
        // Full window, every run short: the collapse must leave the
        // placeholder rather than an empty window. The placeholder then
        // absorbs the elapsed 100ms as the well-defined last run.
        t.append("Thumb_Up", Right, 200).unwrap();
        assert_eq!(t.len(), 2);
        let view = t.sequence_view();
        let front = &view.runs()[0];
        assert_eq!(front.label, EMPTY_LABEL);
        assert_eq!(front.duration_ms, 850);
    }

    #[test]
    fn test_end_to_end_open_palm_hold() {
        let mut t = tracker(750, 4, 60_000);
        t.append("Open_Palm", Right, 0).unwrap();
        t.append("Open_Palm", Right, 800).unwrap();
        let view = t.sequence_view();
        assert_eq!(view.len(), 1);
        assert_eq!(view.runs()[0].label, "Open_Palm");
        assert_eq!(view.runs()[0].duration_ms, 800);

        let target = GestureSequence::from_steps([("Open_Palm", 750u64, Either)]);
        assert!(view.contains(&target));
        t.clear_queue();
        assert!(t.sequence_view().is_empty());
        assert!(!t.sequence_view().contains(&target));
    }
}
