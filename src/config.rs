//! # Run Configuration
//!
//! Batch parameters for a corpus run. Values can come from a YAML file
//! (`--config run.yaml`), with individual CLI flags taking precedence;
//! anything left unset falls back to the defaults below.
//!
//! ```yaml
//! source-dir: corpus/haydn_op20
//! resolution: 0.5
//! unique: true
//! display-divisor: 1.0
//! extension: krn
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::BigramError;
use crate::score::{quarters_to_ticks, Ticks};

/// Raw YAML shape: everything optional so a config file can set only the
/// parameters it cares about.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub source_dir: Option<PathBuf>,
    /// Sampling step in quarter-note units.
    pub resolution: Option<f64>,
    pub unique: Option<bool>,
    pub display_divisor: Option<f64>,
    /// File extension (without the dot) selecting corpus files.
    pub extension: Option<String>,
}

impl RawConfig {
    pub fn from_yaml(source: &str) -> Result<Self, BigramError> {
        serde_yaml::from_str(source).map_err(|e| BigramError::ConfigError(e.to_string()))
    }
}

/// Fully resolved parameters for one batch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source_dir: PathBuf,
    pub resolution: Ticks,
    pub unique: bool,
    pub display_divisor: f64,
    pub extension: String,
}

impl RunConfig {
    /// Merge a raw config with CLI overrides and validate. CLI values win;
    /// the source directory must come from one of the two.
    pub fn resolve(
        raw: RawConfig,
        source_dir: Option<PathBuf>,
        resolution: Option<f64>,
        unique: bool,
        display_divisor: Option<f64>,
        extension: Option<String>,
    ) -> Result<Self, BigramError> {
        let source_dir = source_dir.or(raw.source_dir).ok_or_else(|| {
            BigramError::ConfigError("no source directory given".to_string())
        })?;

        let resolution_quarters = resolution.or(raw.resolution).unwrap_or(0.5);
        if !(resolution_quarters > 0.0) {
            return Err(BigramError::ConfigError(format!(
                "resolution must be positive, got {}",
                resolution_quarters
            )));
        }
        let resolution = quarters_to_ticks(resolution_quarters);
        if resolution <= 0 {
            return Err(BigramError::ConfigError(format!(
                "resolution {} is below one tick",
                resolution_quarters
            )));
        }

        let display_divisor = display_divisor.or(raw.display_divisor).unwrap_or(1.0);
        if !(display_divisor > 0.0) {
            return Err(BigramError::ConfigError(format!(
                "display-divisor must be positive, got {}",
                display_divisor
            )));
        }

        Ok(Self {
            source_dir,
            resolution,
            unique: unique || raw.unique.unwrap_or(false),
            display_divisor,
            extension: extension.or(raw.extension).unwrap_or_else(|| "krn".to_string()),
        })
    }
}
