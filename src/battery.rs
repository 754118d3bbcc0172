//! Battery state and configured limits
//!
//! Both are plain value snapshots. The limits are validated once when the
//! configuration is loaded; the engine trusts them afterwards.

use crate::error::{HestiaError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Current battery state of charge in percent (0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BatteryState {
    pub soc: f64,
}

impl BatteryState {
    pub const fn new(soc: f64) -> Self {
        Self { soc }
    }
}

/// Configured battery limits and ratings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BatteryLimits {
    /// Minimum usable state of charge in percent
    pub soc_min: f64,

    /// Maximum state of charge in percent
    pub soc_max: f64,

    /// Usable battery capacity in kWh
    pub capacity_kwh: f64,

    /// Nameplate maximum charge power in watts
    pub max_charge_w: f64,

    /// Nameplate maximum discharge power in watts
    pub max_discharge_w: f64,
}

impl Default for BatteryLimits {
    fn default() -> Self {
        Self {
            soc_min: 10.0,
            soc_max: 95.0,
            capacity_kwh: 10.0,
            max_charge_w: 3000.0,
            max_discharge_w: 3000.0,
        }
    }
}

impl BatteryLimits {
    /// Energy above `soc_min` that can still be discharged, in kWh
    pub fn usable_kwh(&self, state: BatteryState) -> f64 {
        let usable_soc_pct = (state.soc - self.soc_min).max(0.0);
        self.capacity_kwh * usable_soc_pct / 100.0
    }

    /// Discharge rating in kW
    pub fn discharge_kw(&self) -> f64 {
        self.max_discharge_w / 1000.0
    }

    /// Realistic average charge rate in kW after applying `derating` to the
    /// nameplate rating
    pub fn effective_charge_kw(&self, derating: f64) -> f64 {
        self.max_charge_w * derating / 1000.0
    }

    /// Reject limits the engine cannot reason about
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("battery.soc_min", self.soc_min),
            ("battery.soc_max", self.soc_max),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(HestiaError::validation(field, "Must be within 0..=100"));
            }
        }

        if self.soc_min > self.soc_max {
            return Err(HestiaError::validation(
                "battery.soc_min",
                format!("Must not exceed soc_max ({} > {})", self.soc_min, self.soc_max),
            ));
        }

        if !self.capacity_kwh.is_finite() || self.capacity_kwh <= 0.0 {
            return Err(HestiaError::validation(
                "battery.capacity_kwh",
                "Must be positive",
            ));
        }

        // A zero charge rating would make every time-to-charge estimate infinite
        if !self.max_charge_w.is_finite() || self.max_charge_w <= 0.0 {
            return Err(HestiaError::validation(
                "battery.max_charge_w",
                "Must be positive",
            ));
        }

        if !self.max_discharge_w.is_finite() || self.max_discharge_w < 0.0 {
            return Err(HestiaError::validation(
                "battery.max_discharge_w",
                "Must not be negative",
            ));
        }

        Ok(())
    }
}
