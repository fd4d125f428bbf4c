use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_COLLECTION_ID, DEFAULT_IDLE_TIMEOUT, DEFAULT_KEY_POLL, DEFAULT_MATCH_THRESHOLD,
    DEFAULT_NOTIFICATION_QUEUE, DEFAULT_RECOGNITION_TIMEOUT, DEFAULT_WINDOW_TITLE,
};

#[derive(Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("idle timeout must be greater than zero")]
    ZeroIdleTimeout,
    #[error("recognition timeout must be greater than zero")]
    ZeroRecognitionTimeout,
    #[error("match threshold must be between 0.0 and 1.0, got {0}")]
    ThresholdOutOfRange(f32),
    #[error("collection id must not be empty")]
    EmptyCollection,
    #[error("notification queue must hold at least one event")]
    ZeroNotificationQueue,
}

/// Tunables for the watch pipeline, persisted as JSON.
///
/// Missing keys fall back to their defaults so a settings file only needs
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub idle_timeout_ms: u64,
    pub match_threshold: f32,
    pub collection_id: String,
    pub recognition_url: Option<String>,
    pub recognition_timeout_ms: u64,
    pub key_poll_ms: u64,
    pub window_title: String,
    pub notification_queue: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT.as_millis() as u64,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            collection_id: DEFAULT_COLLECTION_ID.to_string(),
            recognition_url: None,
            recognition_timeout_ms: DEFAULT_RECOGNITION_TIMEOUT.as_millis() as u64,
            key_poll_ms: DEFAULT_KEY_POLL.as_millis() as u64,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            notification_queue: DEFAULT_NOTIFICATION_QUEUE,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("facewatch").join("settings.json"))
    }

    /// Loads settings from the user config directory, or defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Loads settings from `path`. An absent or malformed file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed settings in {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.idle_timeout_ms == 0 {
            return Err(SettingsError::ZeroIdleTimeout);
        }
        if self.recognition_timeout_ms == 0 {
            return Err(SettingsError::ZeroRecognitionTimeout);
        }
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(SettingsError::ThresholdOutOfRange(self.match_threshold));
        }
        if self.collection_id.trim().is_empty() {
            return Err(SettingsError::EmptyCollection);
        }
        if self.notification_queue == 0 {
            return Err(SettingsError::ZeroNotificationQueue);
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn recognition_timeout(&self) -> Duration {
        Duration::from_millis(self.recognition_timeout_ms)
    }

    pub fn key_poll(&self) -> Duration {
        Duration::from_millis(self.key_poll_ms)
    }
}
