//! Filter configuration loaded from and saved to JSON files

use crate::core::{ACCURACY_TOLERANCE_PERCENT, TIME_THRESHOLD_MS, VELOCITY_THRESHOLD_MPS};
use crate::filter::FilterParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for {parameter}: {value} ({reason})")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
}

/// Acceptance thresholds as persisted configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Elapsed time after which any plausible candidate is accepted (ms)
    pub time_threshold_ms: i64,
    /// Divisor applied to the previous accuracy to bound tolerable degradation
    pub accuracy_tolerance_percent: f64,
    /// Maximum plausible speed between consecutive points (m/s)
    pub velocity_threshold_mps: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            time_threshold_ms: TIME_THRESHOLD_MS,
            accuracy_tolerance_percent: ACCURACY_TOLERANCE_PERCENT,
            velocity_threshold_mps: VELOCITY_THRESHOLD_MPS,
        }
    }
}

impl FilterConfig {
    /// Load and validate configuration from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;

        let config: FilterConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path_str,
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path_str.clone(),
            source,
        })?;

        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path_str,
            source,
        })
    }

    /// Check that every threshold is usable by the filter
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_threshold_ms <= 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "time_threshold_ms".to_string(),
                value: self.time_threshold_ms.to_string(),
                reason: "time threshold must be positive".to_string(),
            });
        }
        if !(self.accuracy_tolerance_percent > 0.0) || !self.accuracy_tolerance_percent.is_finite()
        {
            return Err(ConfigError::InvalidParameter {
                parameter: "accuracy_tolerance_percent".to_string(),
                value: self.accuracy_tolerance_percent.to_string(),
                reason: "accuracy tolerance must be a positive finite number".to_string(),
            });
        }
        if !(self.velocity_threshold_mps > 0.0) || !self.velocity_threshold_mps.is_finite() {
            return Err(ConfigError::InvalidParameter {
                parameter: "velocity_threshold_mps".to_string(),
                value: self.velocity_threshold_mps.to_string(),
                reason: "velocity threshold must be a positive finite number".to_string(),
            });
        }
        Ok(())
    }
}

impl From<FilterConfig> for FilterParams {
    fn from(config: FilterConfig) -> Self {
        Self {
            time_threshold_ms: config.time_threshold_ms,
            accuracy_tolerance_percent: config.accuracy_tolerance_percent,
            velocity_threshold_mps: config.velocity_threshold_mps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_matches_reference_thresholds() {
        let config = FilterConfig::default();

        assert_eq!(config.time_threshold_ms, 30_000);
        assert_eq!(config.accuracy_tolerance_percent, 10.0);
        assert_eq!(config.velocity_threshold_mps, 200.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_converts_to_filter_params() {
        let config = FilterConfig {
            time_threshold_ms: 15_000,
            accuracy_tolerance_percent: 20.0,
            velocity_threshold_mps: 90.0,
        };

        let params = FilterParams::from(config.clone());

        assert_eq!(params.time_threshold_ms, config.time_threshold_ms);
        assert_eq!(
            params.velocity_threshold_mps,
            config.velocity_threshold_mps
        );
    }

    #[test]
    fn test_rejects_non_positive_thresholds() {
        let config = FilterConfig {
            time_threshold_ms: 0,
            ..FilterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { .. })
        ));

        let config = FilterConfig {
            velocity_threshold_mps: f64::NAN,
            ..FilterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = FilterConfig {
            time_threshold_ms: 45_000,
            accuracy_tolerance_percent: 5.0,
            velocity_threshold_mps: 120.0,
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: FilterConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("pointfilter_config_round_trip.json");

        let config = FilterConfig {
            time_threshold_ms: 10_000,
            ..FilterConfig::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = FilterConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = FilterConfig::load_from_file("/nonexistent/pointfilter.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
