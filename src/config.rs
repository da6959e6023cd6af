//! User configuration.
//!
//! Read from a JSON file. Every field is optional and falls back to the
//! built-in default, so `{}` is a valid configuration.

use crate::session::{DEFAULT_TEMPO, MAX_TEMPO, MIN_TEMPO};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Tempo must be between 20 and 300 BPM, got {0}")]
    Tempo(u32),

    #[error("Backend URL must start with http:// or https://, got {0}")]
    BackendUrl(String),
}

/// Composer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Tempo of a fresh session, in BPM.
    pub default_tempo: u32,
    /// Time each note stays highlighted during playback.
    pub note_interval_ms: u64,
    /// Lifetime of success status messages.
    pub status_ttl_ms: u64,
    /// Identifier requested by the load command.
    pub load_target: String,
    /// Name pre-filled in the save dialog.
    pub default_save_name: String,
    /// Base URL of a remote studio service. The in-process studio is used
    /// when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            default_tempo: DEFAULT_TEMPO,
            note_interval_ms: 500,
            status_ttl_ms: 3000,
            load_target: "sample".to_string(),
            default_save_name: "My Composition".to_string(),
            backend_url: None,
        }
    }
}

impl ComposerConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the tempo is outside
    /// the editable range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Overrides the default tempo.
    ///
    /// # Errors
    ///
    /// Returns an error if `tempo` is outside the editable range.
    pub fn with_tempo(mut self, tempo: u32) -> Result<Self, ConfigError> {
        self.default_tempo = tempo;
        self.validate()?;
        Ok(self)
    }

    /// Points the gateway at a remote studio service.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not an http(s) URL.
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        self.backend_url = Some(url.into());
        self.validate()?;
        Ok(self)
    }

    pub fn note_interval(&self) -> Duration {
        Duration::from_millis(self.note_interval_ms)
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_millis(self.status_ttl_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TEMPO..=MAX_TEMPO).contains(&self.default_tempo) {
            return Err(ConfigError::Tempo(self.default_tempo));
        }
        if let Some(url) = &self.backend_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::BackendUrl(url.clone()));
            }
        }
        Ok(())
    }
}
