// Engine configuration - validated once, immutable afterwards

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("default_duration_ms must be greater than zero")]
    ZeroDuration,

    #[error("poll_interval_ms must be greater than zero")]
    ZeroPollInterval,

    #[error("max_pending must be at least 1")]
    ZeroCapacity,

    #[error("default_velocity {0} is outside the MIDI range 0-127")]
    VelocityOutOfRange(u8),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scheduler configuration.
///
/// Validated by [`SonifierConfig::validate`] before the engine starts;
/// the engine never re-checks these at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonifierConfig {
    /// Sounding time for events that carry no duration, in milliseconds
    pub default_duration_ms: u64,
    /// Velocity for events that carry no velocity hint
    pub default_velocity: u8,
    /// Upper bound on simultaneously pending note requests
    pub max_pending: usize,
    /// Worker idle-poll interval in milliseconds; bounds worst-case
    /// note-on/note-off latency when the queue is quiet
    pub poll_interval_ms: u64,
}

impl Default for SonifierConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 250,
            default_velocity: 100,
            max_pending: 64,
            poll_interval_ms: 5,
        }
    }
}

impl SonifierConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.max_pending == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.default_velocity > 127 {
            return Err(ConfigError::VelocityOutOfRange(self.default_velocity));
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: SonifierConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
