//! Reconstruction configuration.
//!
//! All fields have defaults, so a config file only needs the values it
//! changes:
//!
//! ```json
//! {
//!   "interval_seconds": 10,
//!   "checkpoints": [60, 180, 300],
//!   "unit_costs": { "Hellbat": { "minerals": 100, "gas": 0, "supply": 2.0 } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::state::{Seconds, UnitCost, ValueModel};

/// Default interval step in seconds.
pub const DEFAULT_INTERVAL: Seconds = 7;

/// Default checkpoint list in seconds.
pub const DEFAULT_CHECKPOINTS: [Seconds; 5] = [120, 240, 360, 480, 600];

/// Default batch window length in seconds.
pub const DEFAULT_BATCH_WINDOW: Seconds = 300;

/// Error produced when a configuration cannot be loaded or is invalid.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this schema.
    #[error("failed to parse config {path}: {source}")]
    Json {
        /// Config file path.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The interval step is zero.
    #[error("interval must be at least one second")]
    InvalidInterval,

    /// The batch window is zero.
    #[error("batch window must be at least one second")]
    InvalidWindow,

    /// The checkpoint list is not strictly ascending.
    #[error("checkpoints must be strictly ascending (found {previous} before {next})")]
    UnsortedCheckpoints {
        /// Earlier entry.
        previous: Seconds,
        /// Entry that is not greater than `previous`.
        next: Seconds,
    },
}

/// Parameters for reconstructing a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Interval mode step in seconds.
    pub interval_seconds: Seconds,
    /// Checkpoint timestamps in seconds, ascending.
    pub checkpoints: Vec<Seconds>,
    /// Batch window length in seconds.
    pub batch_window_seconds: Seconds,
    /// Unit costs added to, or replacing, the built-in table.
    pub unit_costs: BTreeMap<String, UnitCost>,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_INTERVAL,
            checkpoints: DEFAULT_CHECKPOINTS.to_vec(),
            batch_window_seconds: DEFAULT_BATCH_WINDOW,
            unit_costs: BTreeMap::new(),
        }
    }
}

impl ReconstructionConfig {
    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values can drive a reconstruction.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_seconds == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        if self.batch_window_seconds == 0 {
            return Err(ConfigError::InvalidWindow);
        }
        check_ascending(&self.checkpoints)
    }

    /// Built-in value table extended with the configured unit costs.
    #[must_use]
    pub fn value_model(&self) -> ValueModel {
        ValueModel::standard().with_entries(
            self.unit_costs
                .iter()
                .map(|(name, cost)| (name.clone(), *cost)),
        )
    }
}

/// Ensure a checkpoint list is strictly ascending.
///
/// # Errors
///
/// Returns the first out-of-order pair.
pub fn check_ascending(checkpoints: &[Seconds]) -> Result<(), ConfigError> {
    match checkpoints.windows(2).find(|w| w[1] <= w[0]) {
        Some(pair) => Err(ConfigError::UnsortedCheckpoints {
            previous: pair[0],
            next: pair[1],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ReconstructionConfig::default();
        assert_eq!(config.interval_seconds, 7);
        assert_eq!(config.checkpoints, vec![120, 240, 360, 480, 600]);
        assert_eq!(config.batch_window_seconds, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ReconstructionConfig =
            serde_json::from_str(r#"{ "interval_seconds": 10 }"#).unwrap();
        assert_eq!(config.interval_seconds, 10);
        assert_eq!(config.checkpoints, DEFAULT_CHECKPOINTS.to_vec());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = ReconstructionConfig {
            interval_seconds: 0,
            ..ReconstructionConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidInterval)));
    }

    #[test]
    fn test_validate_rejects_unsorted_checkpoints() {
        let config = ReconstructionConfig {
            checkpoints: vec![60, 120, 120],
            ..ReconstructionConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsortedCheckpoints {
                previous: 120,
                next: 120
            }
        ));
    }

    #[test]
    fn test_unit_costs_extend_model() {
        let mut config = ReconstructionConfig::default();
        config.unit_costs.insert(
            "Hellbat".to_string(),
            UnitCost {
                minerals: 100,
                gas: 0,
                supply: 2.0,
            },
        );
        config.unit_costs.insert(
            "Marine".to_string(),
            UnitCost {
                minerals: 60,
                gas: 0,
                supply: 1.0,
            },
        );

        let model = config.value_model();
        assert_eq!(model.valuation("Hellbat").unwrap().value, 100.0);
        assert_eq!(model.valuation("Marine").unwrap().value, 60.0);
        assert_eq!(model.valuation("Stalker").unwrap().value, 200.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "checkpoints": [60, 30] }}"#).unwrap();

        let err = ReconstructionConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsortedCheckpoints { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ReconstructionConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
