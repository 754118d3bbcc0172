//! Configuration management for Hestia
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files. `HESTIA_CONFIG` may point at an explicit file.

use crate::battery::BatteryLimits;
use crate::engine::Tuning;
use crate::error::{HestiaError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod defaults;

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "HESTIA_CONFIG";

/// Default search locations, in order
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "hestia_config.yaml",
    "/data/hestia_config.yaml",
    "/etc/hestia/config.yaml",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Battery limits and power ratings
    pub battery: BatteryLimits,

    /// Price thresholds
    pub pricing: PricingConfig,

    /// Decision rule constants
    #[serde(default)]
    pub tuning: Tuning,

    /// Where the poller reads its input snapshots from
    pub source: SourceConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

/// Pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PricingConfig {
    /// Baseline price per kWh above which a slot counts as expensive
    pub expensive_threshold: f64,

    /// Currency symbol used in human-readable output
    pub currency_symbol: String,
}

/// Input snapshot source configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceConfig {
    /// YAML or JSON file holding `prices` and `soc`, rewritten by the host system
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional console-specific level, defaults to `level`
    #[serde(default)]
    pub console_level: Option<String>,

    /// Optional file-specific level, defaults to `level`
    #[serde(default)]
    pub file_level: Option<String>,

    /// Log file path; daily files roll as `<stem>.<date>.<ext>` beside it.
    /// A path without an extension names the log directory.
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from `HESTIA_CONFIG` or the default locations,
    /// falling back to built-in defaults
    pub fn load() -> Result<Self> {
        Self::discover(
            std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            &DEFAULT_CONFIG_PATHS,
        )
    }

    /// Load `explicit` if given (it must exist), else the first existing
    /// path in `search`, else the built-in defaults
    pub fn discover<P: AsRef<Path>>(explicit: Option<PathBuf>, search: &[P]) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match search
            .iter()
            .map(<P as AsRef<Path>>::as_ref)
            .find(|p| p.exists())
        {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path when given, otherwise search, then validate
    pub fn load_validated(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::load()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.battery.validate()?;
        self.tuning.validate()?;

        if !self.pricing.expensive_threshold.is_finite() || self.pricing.expensive_threshold < 0.0
        {
            return Err(HestiaError::validation(
                "pricing.expensive_threshold",
                "Must not be negative",
            ));
        }

        if self.source.path.trim().is_empty() {
            return Err(HestiaError::validation(
                "source.path",
                "Path cannot be empty",
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(HestiaError::validation(
                "poll_interval_ms",
                "Must be greater than 0",
            ));
        }

        Ok(())
    }
}
