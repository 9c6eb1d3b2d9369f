//! Action bindings and the per-frame dispatch loop.
//!
//! Bindings pair an action name with a target pattern. They are evaluated
//! in registration order against the tracker's filtered view; the first
//! satisfied binding fires, the tracker is cleared, and evaluation stops —
//! at most one action per frame.

use crate::core::run::HandMask;
use crate::core::sequence::GestureSequence;
use crate::core::tracker::{GestureTracker, TrackerError};
use crate::recognizer::types::{appends_for_frame, FrameObservation};
use std::collections::HashSet;
use std::fmt;

/// Errors from binding registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The target pattern is empty or names a label outside the vocabulary.
    /// Fatal at startup, never recoverable at runtime.
    InvalidPattern(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::InvalidPattern(reason) => write!(f, "Invalid target pattern: {reason}"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Insertion-ordered registry of `(action name, target pattern)` bindings.
pub struct GestureBindings {
    bindings: Vec<(String, GestureSequence)>,
    vocabulary: HashSet<String>,
}

impl GestureBindings {
    /// Create an empty registry validating against the given vocabulary.
    pub fn new(vocabulary: HashSet<String>) -> Self {
        Self {
            bindings: Vec::new(),
            vocabulary,
        }
    }

    /// Register a target pattern under an action name.
    ///
    /// The pattern must be non-empty and every step label must belong to
    /// the vocabulary.
    pub fn register(
        &mut self,
        action: impl Into<String>,
        target: GestureSequence,
    ) -> Result<(), DispatchError> {
        let action = action.into();
        if target.is_empty() {
            return Err(DispatchError::InvalidPattern(format!(
                "pattern for {action:?} has no steps"
            )));
        }
        for run in target.runs() {
            if !self.vocabulary.contains(&run.label) {
                return Err(DispatchError::InvalidPattern(format!(
                    "pattern for {action:?} uses unrecognized label {:?}",
                    run.label
                )));
            }
        }
        self.bindings.push((action, target));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Registered action names, in registration order.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(name, _)| name.as_str())
    }

    /// First-registered binding whose target the view contains, if any.
    pub fn match_first(&self, view: &GestureSequence) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(_, target)| view.contains(target))
            .map(|(name, _)| name.as_str())
    }
}

/// Tracker plus bindings: the full frame-to-action engine.
///
/// Owns all mutable state; callers must serialize frames through it (one
/// dedicated processing thread, or a mutex around the engine).
pub struct Engine {
    tracker: GestureTracker,
    bindings: GestureBindings,
}

impl Engine {
    pub fn new(tracker: GestureTracker, bindings: GestureBindings) -> Self {
        Self { tracker, bindings }
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    pub fn bindings(&self) -> &GestureBindings {
        &self.bindings
    }

    /// Process one classifier frame.
    ///
    /// Applies the multi-hand disambiguation, appends the resulting events,
    /// then evaluates the bindings against the filtered view. On a match
    /// the tracker is cleared and the action name returned; the caller
    /// invokes the bound action. An `InvalidLabel` error leaves already
    /// appended events in place and must be treated as "skip this frame".
    pub fn process_frame(
        &mut self,
        frame: &FrameObservation,
    ) -> Result<Option<String>, TrackerError> {
        for (label, mask) in appends_for_frame(frame) {
            self.tracker.append(&label, mask, frame.timestamp_ms)?;
        }
        Ok(self.dispatch())
    }

    /// Append a single pre-disambiguated event and dispatch.
    pub fn process_event(
        &mut self,
        label: &str,
        observed: HandMask,
        timestamp_ms: u64,
    ) -> Result<Option<String>, TrackerError> {
        self.tracker.append(label, observed, timestamp_ms)?;
        Ok(self.dispatch())
    }

    fn dispatch(&mut self) -> Option<String> {
        let view = self.tracker.sequence_view();
        let fired = self.bindings.match_first(&view).map(str::to_string);
        if fired.is_some() {
            self.tracker.clear_queue();
        }
        fired
    }
}
