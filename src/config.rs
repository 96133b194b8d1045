//! Configuration types for eob-extract

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::extract::DEFAULT_OPEN_TIMEOUT_MS;
use crate::storage::MIN_RECORD_WORDS;
use crate::{EobError, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backward search tuning
    #[serde(default)]
    pub scan: ScanConfig,
    /// Record size limits
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Input open behaviour
    #[serde(default)]
    pub open: OpenConfig,
}

/// Backward search tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Words read per backward window
    pub chunk_capacity: usize,
    /// Maximum distance from EOF, in words, before giving up
    pub horizon: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            chunk_capacity: 10_000,
            horizon: 200_000,
        }
    }
}

/// Record size limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest record length field accepted before allocating a buffer
    pub max_record_words: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_record_words: 4 * 1024 * 1024, // 16 MB of words
        }
    }
}

/// Input open behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenConfig {
    /// Deadline for opening an input file, in milliseconds
    pub timeout_ms: u64,
}

impl Default for OpenConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_OPEN_TIMEOUT_MS,
        }
    }
}

impl OpenConfig {
    /// Open deadline as a `Duration`
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, parsed or fails validation
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EobError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| EobError::ConfigError(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if any tunable is out of range
    pub fn validate(&self) -> Result<()> {
        if self.scan.chunk_capacity == 0 {
            return Err(EobError::ConfigError(
                "scan.chunk_capacity must be > 0".to_string(),
            ));
        }

        if self.scan.horizon < self.scan.chunk_capacity {
            return Err(EobError::ConfigError(format!(
                "scan.horizon ({}) must be at least scan.chunk_capacity ({})",
                self.scan.horizon, self.scan.chunk_capacity
            )));
        }

        if self.limits.max_record_words < MIN_RECORD_WORDS {
            return Err(EobError::ConfigError(format!(
                "limits.max_record_words must be >= {MIN_RECORD_WORDS}"
            )));
        }

        if self.open.timeout_ms == 0 {
            return Err(EobError::ConfigError(
                "open.timeout_ms must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scan.chunk_capacity, 10_000);
        assert_eq!(config.scan.horizon, 200_000);
        assert_eq!(config.open.timeout(), Duration::from_millis(5000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_partial() {
        let config_toml = r"
            [scan]
            chunk_capacity = 512

            [open]
            timeout_ms = 250
        ";

        let config: Config = toml::from_str(config_toml).unwrap();
        assert_eq!(config.scan.chunk_capacity, 512);
        assert_eq!(config.scan.horizon, 200_000);
        assert_eq!(config.open.timeout_ms, 250);
        assert_eq!(config.limits.max_record_words, 4 * 1024 * 1024);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        let config_toml = r"
            [scan]
            chunk_capacity = 100
            horizon = 1000

            [limits]
            max_record_words = 64
        ";
        file.write_all(config_toml.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.scan.horizon, 1000);
        assert_eq!(config.limits.max_record_words, 64);
    }

    #[test]
    fn test_invalid_config_zero_chunk() {
        let config_toml = r"
            [scan]
            chunk_capacity = 0
        ";

        let config: Config = toml::from_str(config_toml).unwrap();
        assert!(matches!(config.validate(), Err(EobError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_config_horizon_below_chunk() {
        let mut config = Config::default();
        config.scan.horizon = config.scan.chunk_capacity - 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_config_tiny_ceiling() {
        let mut config = Config::default();
        config.limits.max_record_words = 4;
        assert!(config.validate().is_err());
    }
}
