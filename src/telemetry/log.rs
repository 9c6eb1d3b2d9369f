//! Session telemetry log.
//!
//! This module tracks and exposes counters about what the engine did with a
//! session's frame stream: frames seen, events appended, runs aged out,
//! actions fired, frames rejected for unknown labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Counters for the current session.
#[derive(Debug)]
pub struct SessionLog {
    /// Number of classifier frames processed
    frames_processed: AtomicU64,
    /// Number of events appended to the tracker
    events_appended: AtomicU64,
    /// Number of actions fired
    actions_fired: AtomicU64,
    /// Number of frames rejected for an unrecognized label
    invalid_labels: AtomicU64,
    /// Unique id for this session
    session_id: Uuid,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl SessionLog {
    /// Create a new session log.
    pub fn new() -> Self {
        Self {
            frames_processed: AtomicU64::new(0),
            events_appended: AtomicU64::new(0),
            actions_fired: AtomicU64::new(0),
            invalid_labels: AtomicU64::new(0),
            session_id: Uuid::new_v4(),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a session log with persistence.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        // Carry cumulative counters across sessions when present.
        if let Err(e) = log.load() {
            eprintln!("Note: Could not load previous session stats: {e}");
        }

        log
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Record a processed frame.
    pub fn record_frame(&self) {
        self.frames_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record appended tracker events.
    pub fn record_appends(&self, count: u64) {
        self.events_appended.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a fired action.
    pub fn record_action_fired(&self) {
        self.actions_fired.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a frame rejected for an unrecognized label.
    pub fn record_invalid_label(&self) {
        self.invalid_labels.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            frames_processed: self.frames_processed.load(Ordering::Relaxed),
            events_appended: self.events_appended.load(Ordering::Relaxed),
            actions_fired: self.actions_fired.load(Ordering::Relaxed),
            invalid_labels: self.invalid_labels.load(Ordering::Relaxed),
            session_id: self.session_id,
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds() as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session Statistics:\n\
             - Frames processed: {}\n\
             - Events appended: {}\n\
             - Actions fired: {}\n\
             - Invalid labels skipped: {}\n\
             - Session duration: {} seconds",
            stats.frames_processed,
            stats.events_appended,
            stats.actions_fired,
            stats.invalid_labels,
            stats.session_duration_secs
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                frames_processed: stats.frames_processed,
                events_appended: stats.events_appended,
                actions_fired: stats.actions_fired,
                invalid_labels: stats.invalid_labels,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;

            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.frames_processed
                    .store(persisted.frames_processed, Ordering::Relaxed);
                self.events_appended
                    .store(persisted.events_appended, Ordering::Relaxed);
                self.actions_fired
                    .store(persisted.actions_fired, Ordering::Relaxed);
                self.invalid_labels
                    .store(persisted.invalid_labels, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.frames_processed.store(0, Ordering::Relaxed);
        self.events_appended.store(0, Ordering::Relaxed);
        self.actions_fired.store(0, Ordering::Relaxed);
        self.invalid_labels.store(0, Ordering::Relaxed);
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of session statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub frames_processed: u64,
    pub events_appended: u64,
    pub actions_fired: u64,
    pub invalid_labels: u64,
    pub session_id: Uuid,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    frames_processed: u64,
    events_appended: u64,
    actions_fired: u64,
    invalid_labels: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared session log.
pub type SharedSessionLog = Arc<SessionLog>;

/// Create a new shared session log.
pub fn create_shared_log() -> SharedSessionLog {
    Arc::new(SessionLog::new())
}

/// Create a new shared session log with persistence.
pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedSessionLog {
    Arc::new(SessionLog::with_persistence(path))
}
