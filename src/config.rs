//! Configuration for the handwave agent.

use crate::core::run::HandMask;
use crate::core::sequence::GestureSequence;
use crate::core::tracker::TrackerConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Default minimum significant gesture duration.
pub const DEFAULT_MIN_GESTURE_MS: u64 = 750;

/// Default maximum number of runs in the tracker window.
pub const DEFAULT_HISTORY_LEN: usize = 4;

/// Default maximum cumulative run age.
pub const DEFAULT_MAX_HISTORY_AGE_MS: u64 = 10_000;

/// The classifier model's gesture vocabulary.
pub const DEFAULT_VOCABULARY: [&str; 8] = [
    "None",
    "Closed_Fist",
    "Open_Palm",
    "Pointing_Up",
    "Thumb_Down",
    "Thumb_Up",
    "Victory",
    "ILoveYou",
];

/// One step of a configured target pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    pub label: String,
    pub min_duration_ms: u64,
    #[serde(default = "default_hands")]
    pub hands: HandMask,
}

fn default_hands() -> HandMask {
    HandMask::Either
}

/// A configured action binding: name plus ordered pattern steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingConfig {
    pub action: String,
    pub steps: Vec<StepConfig>,
}

impl BindingConfig {
    fn new(action: &str, steps: &[(&str, u64, HandMask)]) -> Self {
        Self {
            action: action.to_string(),
            steps: steps
                .iter()
                .map(|&(label, min_duration_ms, hands)| StepConfig {
                    label: label.to_string(),
                    min_duration_ms,
                    hands,
                })
                .collect(),
        }
    }

    /// Build the target pattern for this binding.
    pub fn to_sequence(&self) -> GestureSequence {
        GestureSequence::from_steps(
            self.steps
                .iter()
                .map(|s| (s.label.clone(), s.min_duration_ms, s.hands)),
        )
    }
}

/// Main configuration for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Minimum duration for a run to count as a significant gesture
    pub min_gesture_ms: u64,

    /// Maximum number of runs retained in the tracker window
    pub history_len: usize,

    /// Maximum cumulative age of a run before it is evicted
    pub max_history_age_ms: u64,

    /// Recognized gesture labels
    pub vocabulary: Vec<String>,

    /// Action bindings evaluated in order; first match wins
    pub bindings: Vec<BindingConfig>,

    /// Path for storing session telemetry
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("handwave");

        use HandMask::{Both, Either};
        Self {
            min_gesture_ms: DEFAULT_MIN_GESTURE_MS,
            history_len: DEFAULT_HISTORY_LEN,
            max_history_age_ms: DEFAULT_MAX_HISTORY_AGE_MS,
            vocabulary: DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect(),
            bindings: vec![
                // "None" steps require Both: idle (zero-hand) frames carry
                // the both-hands mask.
                BindingConfig::new(
                    "next",
                    &[
                        ("None", 500, Both),
                        ("Open_Palm", 1_500, Either),
                        ("None", 500, Both),
                    ],
                ),
                BindingConfig::new(
                    "prev",
                    &[("None", 500, Both), ("Pointing_Up", 2_500, Either)],
                ),
                BindingConfig::new("like", &[("Thumb_Up", 3_000, Either)]),
                BindingConfig::new("dislike", &[("Thumb_Down", 3_000, Either)]),
                BindingConfig::new("pause", &[("Victory", 1_000, Either)]),
            ],
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("handwave")
            .join("config.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// The vocabulary as an owned set.
    pub fn vocabulary_set(&self) -> HashSet<String> {
        self.vocabulary.iter().cloned().collect()
    }

    /// Tracker parameters derived from this configuration.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            min_duration_ms: self.min_gesture_ms,
            max_window_len: self.history_len,
            max_history_age_ms: self.max_history_age_ms,
            vocabulary: self.vocabulary_set(),
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.min_gesture_ms, 750);
        assert_eq!(config.history_len, 4);
        assert_eq!(config.vocabulary.len(), 8);
        assert_eq!(config.bindings.len(), 5);
        assert_eq!(config.bindings[0].action, "next");
    }

    #[test]
    fn test_binding_to_sequence() {
        let config = Config::default();
        let next = config.bindings[0].to_sequence();
        assert_eq!(next.len(), 3);
        assert_eq!(next.runs()[1].label, "Open_Palm");
        assert_eq!(next.runs()[1].duration_ms, 1_500);
        assert_eq!(next.runs()[1].hands, HandMask::Either);
    }

    #[test]
    fn test_step_hands_defaults_to_either() {
        let json = r#"{"label":"Victory","min_duration_ms":1000}"#;
        let step: StepConfig = serde_json::from_str(json).unwrap();
        assert_eq!(step.hands, HandMask::Either);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bindings.len(), config.bindings.len());
        assert_eq!(back.vocabulary, config.vocabulary);
    }
}
