//! Battery decision engine
//!
//! [`evaluate`] turns a price forecast and a battery snapshot into a single
//! recommendation. It is a pure function: no I/O, no logging, no state carried
//! between calls. Callers (the poller, the CLI) do the logging.
//!
//! Rule order (highest precedence first):
//! - empty forecast -> `data_missing` / standby
//! - current slot expensive -> protect the battery at `soc_min`, otherwise discharge
//! - cheapest slot still ahead and room to charge -> wait (`cheap_phase_coming`)
//! - cheapest slot is now or behind and room to charge -> charge (`cheap_phase_missed`)
//! - not enough stored energy for the coming peak and too little lead time -> charge
//! - otherwise `battery_ok` / standby

use crate::battery::{BatteryLimits, BatteryState};
use crate::error::{HestiaError, Result};
use crate::prices::{PriceStats, peak_slots};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome code of an evaluation; the serialized names are stable identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    DataMissing,
    ExpensiveNowBatteryProtect,
    ExpensiveNowDischarge,
    CheapPhaseComing,
    CheapPhaseMissed,
    PeakComingNeedCharge,
    BatteryOk,
}

impl Status {
    pub const ALL: [Self; 7] = [
        Self::DataMissing,
        Self::ExpensiveNowBatteryProtect,
        Self::ExpensiveNowDischarge,
        Self::CheapPhaseComing,
        Self::CheapPhaseMissed,
        Self::PeakComingNeedCharge,
        Self::BatteryOk,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DataMissing => "data_missing",
            Self::ExpensiveNowBatteryProtect => "expensive_now_battery_protect",
            Self::ExpensiveNowDischarge => "expensive_now_discharge",
            Self::CheapPhaseComing => "cheap_phase_coming",
            Self::CheapPhaseMissed => "cheap_phase_missed",
            Self::PeakComingNeedCharge => "peak_coming_need_charge",
            Self::BatteryOk => "battery_ok",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = HestiaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| HestiaError::validation("status", format!("Unknown status: {s}")))
    }
}

/// Recommended battery action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Standby,
    Charge,
    Discharge,
}

impl Action {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standby => "standby",
            Self::Charge => "charge",
            Self::Discharge => "discharge",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = HestiaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standby" => Ok(Self::Standby),
            "charge" => Ok(Self::Charge),
            "discharge" => Ok(Self::Discharge),
            _ => Err(HestiaError::validation(
                "action",
                format!("Unknown action: {s}"),
            )),
        }
    }
}

/// Tunable constants of the decision rules; [`evaluate`] always uses the defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Tuning {
    /// Fraction of the day's price span added to the average to form the
    /// dynamic expensive threshold
    pub span_factor: f64,

    /// Fraction of the nameplate charge power assumed as the average charge rate
    pub charge_derating: f64,

    /// Extra lead time in minutes required before a peak starts
    pub safety_minutes: f64,

    /// Length of one forecast slot in minutes
    pub slot_minutes: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            span_factor: 0.25,
            charge_derating: 0.75,
            safety_minutes: 30.0,
            slot_minutes: 15,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<()> {
        if !self.span_factor.is_finite() || self.span_factor < 0.0 {
            return Err(HestiaError::validation(
                "tuning.span_factor",
                "Must not be negative",
            ));
        }
        if !self.charge_derating.is_finite()
            || self.charge_derating <= 0.0
            || self.charge_derating > 1.0
        {
            return Err(HestiaError::validation(
                "tuning.charge_derating",
                "Must be within (0, 1]",
            ));
        }
        if !self.safety_minutes.is_finite() || self.safety_minutes < 0.0 {
            return Err(HestiaError::validation(
                "tuning.safety_minutes",
                "Must not be negative",
            ));
        }
        if self.slot_minutes == 0 {
            return Err(HestiaError::validation(
                "tuning.slot_minutes",
                "Must be greater than 0",
            ));
        }
        Ok(())
    }

    fn slot_hours(&self) -> f64 {
        f64::from(self.slot_minutes) / 60.0
    }
}

/// Intermediate values of an evaluation, for display and troubleshooting only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionDebug {
    pub current: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub span: f64,
    pub dynamic_expensive: f64,
    pub usable_kwh: f64,
    pub peak_slots: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_peak_index: Option<usize>,
    pub cheapest_index: usize,
    pub cheapest_future: bool,
    pub peak_needed_kwh: f64,
    pub missing_kwh: f64,
    pub need_minutes: f64,
    pub safety_minutes: f64,
}

/// Result of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub status: Status,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DecisionDebug>,
}

impl Decision {
    /// Decision used whenever no usable price data is available
    pub const fn data_missing() -> Self {
        Self {
            status: Status::DataMissing,
            action: Action::Standby,
            debug: None,
        }
    }

    /// One-line English explanation, for logs and the CLI
    pub fn explain(&self) -> String {
        let suffix = format!("{} ({})", self.action, self.status);
        let Some(d) = &self.debug else {
            return format!("no price data - {suffix}");
        };
        let cmp = if d.current >= d.dynamic_expensive {
            ">="
        } else {
            "<"
        };
        let mut parts = vec![format!(
            "current={:.4} {} dynamic={:.4}",
            d.current, cmp, d.dynamic_expensive
        )];
        if d.cheapest_future {
            parts.push(format!("cheapest at slot {}", d.cheapest_index));
        }
        if d.missing_kwh > 0.0 {
            parts.push(format!(
                "missing={:.2}kWh need={:.0}min",
                d.missing_kwh, d.need_minutes
            ));
        }
        format!("{} - {}", parts.join(", "), suffix)
    }
}

/// Evaluate with the default [`Tuning`]
pub fn evaluate(
    prices: &[f64],
    state: BatteryState,
    limits: &BatteryLimits,
    expensive_threshold: f64,
) -> Decision {
    evaluate_with(prices, state, limits, expensive_threshold, &Tuning::default())
}

/// Recommend an action for the current slot
pub fn evaluate_with(
    prices: &[f64],
    state: BatteryState,
    limits: &BatteryLimits,
    expensive_threshold: f64,
    tuning: &Tuning,
) -> Decision {
    let Some(stats) = PriceStats::from_prices(prices) else {
        return Decision::data_missing();
    };

    let dynamic_expensive = stats.dynamic_expensive(expensive_threshold, tuning.span_factor);
    let usable_kwh = limits.usable_kwh(state);

    let peaks = peak_slots(prices, dynamic_expensive);
    let first_peak_index = peaks.first().copied();
    let cheapest_future = stats.cheapest_in_future();

    let peak_hours = peaks.len() as f64 * tuning.slot_hours();
    let peak_needed_kwh = peak_hours * limits.discharge_kw();
    let missing_kwh = (peak_needed_kwh - usable_kwh).max(0.0);

    let charge_kw = limits.effective_charge_kw(tuning.charge_derating);
    let need_minutes = if missing_kwh > 0.0 {
        missing_kwh / charge_kw * 60.0
    } else {
        0.0
    };

    let debug = DecisionDebug {
        current: stats.current,
        min: stats.min,
        max: stats.max,
        avg: stats.avg,
        span: stats.span,
        dynamic_expensive,
        usable_kwh,
        peak_slots: peaks.len(),
        first_peak_index,
        cheapest_index: stats.cheapest_index,
        cheapest_future,
        peak_needed_kwh,
        missing_kwh,
        need_minutes,
        safety_minutes: tuning.safety_minutes,
    };

    let (status, action) = if stats.current >= dynamic_expensive {
        if state.soc <= limits.soc_min {
            (Status::ExpensiveNowBatteryProtect, Action::Standby)
        } else {
            (Status::ExpensiveNowDischarge, Action::Discharge)
        }
    } else if cheapest_future && state.soc < limits.soc_max {
        (Status::CheapPhaseComing, Action::Standby)
    } else if !cheapest_future && state.soc < limits.soc_max {
        (Status::CheapPhaseMissed, Action::Charge)
    } else if missing_kwh > 0.0
        && first_peak_index.is_some_and(|idx| {
            let peak_start_minutes = idx as f64 * f64::from(tuning.slot_minutes);
            peak_start_minutes <= need_minutes + tuning.safety_minutes
        })
    {
        (Status::PeakComingNeedCharge, Action::Charge)
    } else {
        (Status::BatteryOk, Action::Standby)
    };

    Decision {
        status,
        action,
        debug: Some(debug),
    }
}
