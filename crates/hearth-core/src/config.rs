use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Hearth application.
///
/// Loaded from `~/.hearth/config.toml` by default. Each section corresponds
/// to one subsystem of the voice pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HearthConfig {
    #[serde(default)]
    pub recognition: RecognitionSettings,
    #[serde(default)]
    pub dispatch: DispatchSettings,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
}

impl HearthConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HearthConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Speech recognition session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionSettings {
    /// BCP-47 language tag for the recognition backend.
    pub language: String,
    /// Whether interim (partial) results are requested.
    pub interim_results: bool,
    /// Continuous listening vs. single-shot sessions.
    pub continuous: bool,
    /// Cap on silent reconnects after a network error.
    pub max_reconnect_attempts: u32,
    /// Backoff before each automatic reconnect, in milliseconds.
    pub reconnect_backoff_ms: u64,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            interim_results: true,
            continuous: false,
            max_reconnect_attempts: 3,
            reconnect_backoff_ms: 1000,
        }
    }
}

/// Command dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// How long a completed command's idempotency key stays held, in
    /// milliseconds. Absorbs redundant re-deliveries from the recognizer.
    pub idempotency_cooldown_ms: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            idempotency_cooldown_ms: 1500,
        }
    }
}

/// Reminder scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerSettings {
    /// Period of the due-reminder poll loop, in seconds.
    pub poll_interval_secs: u64,
    /// Delay before a snoozed reminder re-notifies, in seconds.
    pub snooze_delay_secs: u64,
    /// How long a notification prompt waits for user action before it is
    /// treated as an implicit snooze, in seconds.
    pub prompt_timeout_secs: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            snooze_delay_secs: 300,
            prompt_timeout_secs: 300,
        }
    }
}

/// Canned-response assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Whether unrecognized utterances also get an assistant reply.
    pub enabled: bool,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HearthConfig::default();
        assert_eq!(config.recognition.language, "en-US");
        assert!(config.recognition.interim_results);
        assert!(!config.recognition.continuous);
        assert_eq!(config.recognition.max_reconnect_attempts, 3);
        assert_eq!(config.recognition.reconnect_backoff_ms, 1000);
        assert_eq!(config.dispatch.idempotency_cooldown_ms, 1500);
        assert_eq!(config.scheduler.poll_interval_secs, 60);
        assert_eq!(config.scheduler.snooze_delay_secs, 300);
        assert_eq!(config.scheduler.prompt_timeout_secs, 300);
        assert!(config.assistant.enabled);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = HearthConfig::default();
        config.recognition.max_reconnect_attempts = 5;
        config.scheduler.snooze_delay_secs = 120;
        config.save(&path).unwrap();

        let loaded = HearthConfig::load(&path).unwrap();
        assert_eq!(loaded.recognition.max_reconnect_attempts, 5);
        assert_eq!(loaded.scheduler.snooze_delay_secs, 120);
        // Untouched sections retain defaults.
        assert_eq!(loaded.dispatch.idempotency_cooldown_ms, 1500);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(HearthConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = HearthConfig::load_or_default(&path);
        assert_eq!(config.recognition.language, "en-US");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[scheduler]\npoll_interval_secs = 10\nsnooze_delay_secs = 60\nprompt_timeout_secs = 30\n",
        )
        .unwrap();

        let config = HearthConfig::load(&path).unwrap();
        assert_eq!(config.scheduler.poll_interval_secs, 10);
        assert_eq!(config.recognition.max_reconnect_attempts, 3);
        assert!(config.assistant.enabled);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not toml = =").unwrap();
        assert!(HearthConfig::load(&path).is_err());
    }
}
