//! Input snapshot sources
//!
//! The host system owns the live sensor values. A source hands the poller one
//! consistent snapshot (prices and state of charge taken together) per cycle.

use crate::battery::BatteryState;
use crate::error::{HestiaError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Inputs sampled together for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Per-slot prices, index 0 is the current slot; empty when unknown
    #[serde(default)]
    pub prices: Vec<f64>,

    /// State of charge in percent
    #[serde(alias = "battery_soc")]
    pub soc: f64,
}

impl InputSnapshot {
    pub const fn new(prices: Vec<f64>, soc: f64) -> Self {
        Self { prices, soc }
    }

    pub const fn battery_state(&self) -> BatteryState {
        BatteryState::new(self.soc)
    }

    /// Reject samples the host could not have meant: NaN/infinite values or a
    /// state of charge outside 0..=100. Negative prices are legitimate.
    pub fn validate(&self) -> Result<()> {
        if !self.soc.is_finite() || !(0.0..=100.0).contains(&self.soc) {
            return Err(HestiaError::validation(
                "soc",
                format!("Must be within 0..=100, got {}", self.soc),
            ));
        }
        if let Some(idx) = self.prices.iter().position(|p| !p.is_finite()) {
            return Err(HestiaError::validation(
                "prices",
                format!("Slot {idx} is not a finite number"),
            ));
        }
        Ok(())
    }

    /// Parse a snapshot from text; `.json` paths use JSON, anything else YAML
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let snapshot = if is_json {
            serde_json::from_str(contents)?
        } else {
            serde_yaml::from_str(contents)?
        };
        Ok(snapshot)
    }

    /// Read and parse a snapshot file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents, path)
    }
}

/// Something that can produce an input snapshot on demand
#[async_trait]
pub trait InputSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Take one snapshot of all inputs
    async fn snapshot(&self) -> Result<InputSnapshot>;
}

/// Reads the snapshot from a file that the host system rewrites
pub struct FileSource {
    path: PathBuf,
    logger: StructuredLogger,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let logger = get_logger_with_context(
            LogContext::new("source").with_field("path", path.display().to_string()),
        );
        Self { path, logger }
    }
}

#[async_trait]
impl InputSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn snapshot(&self) -> Result<InputSnapshot> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            HestiaError::source(format!("Cannot read {}: {e}", self.path.display()))
        })?;
        let snapshot = InputSnapshot::parse(&contents, &self.path)?;
        self.logger.trace(&format!(
            "Read snapshot with {} slots, soc={}",
            snapshot.prices.len(),
            snapshot.soc
        ));
        Ok(snapshot)
    }
}

/// In-memory source, replaced wholesale by whoever embeds the engine
pub struct StaticSource {
    current: RwLock<InputSnapshot>,
}

impl StaticSource {
    pub fn new(snapshot: InputSnapshot) -> Self {
        Self {
            current: RwLock::new(snapshot),
        }
    }

    /// Replace the snapshot served from now on
    pub async fn set(&self, snapshot: InputSnapshot) {
        *self.current.write().await = snapshot;
    }
}

#[async_trait]
impl InputSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn snapshot(&self) -> Result<InputSnapshot> {
        Ok(self.current.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_yaml_and_json() {
        let yaml = "prices: [0.1, 0.2]\nsoc: 55\n";
        let snap = InputSnapshot::parse(yaml, Path::new("in.yaml")).unwrap();
        assert_eq!(snap, InputSnapshot::new(vec![0.1, 0.2], 55.0));

        let json = r#"{"prices": [0.3], "battery_soc": 12.5}"#;
        let snap = InputSnapshot::parse(json, Path::new("in.JSON")).unwrap();
        assert_eq!(snap.prices, vec![0.3]);
        assert_eq!(snap.soc, 12.5);
    }

    #[test]
    fn missing_prices_mean_empty_series() {
        let snap = InputSnapshot::parse("soc: 40\n", Path::new("in.yaml")).unwrap();
        assert!(snap.prices.is_empty());
    }

    #[test]
    fn validate_rejects_bad_samples() {
        assert!(InputSnapshot::new(vec![0.1], 101.0).validate().is_err());
        assert!(InputSnapshot::new(vec![0.1], f64::NAN).validate().is_err());
        assert!(InputSnapshot::new(vec![0.1, f64::INFINITY], 50.0).validate().is_err());
        assert!(InputSnapshot::new(vec![-0.02, 0.1], 50.0).validate().is_ok());
        assert!(InputSnapshot::new(vec![], 0.0).validate().is_ok());
    }

    #[tokio::test]
    async fn static_source_serves_latest() {
        let source = StaticSource::new(InputSnapshot::new(vec![0.1], 20.0));
        assert_eq!(source.snapshot().await.unwrap().soc, 20.0);
        source.set(InputSnapshot::new(vec![0.2], 30.0)).await;
        assert_eq!(source.snapshot().await.unwrap().prices, vec![0.2]);
        assert_eq!(source.name(), "static");
    }
}
