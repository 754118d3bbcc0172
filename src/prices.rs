//! Price forecast statistics
//!
//! A price series is a slice of per-slot prices where index 0 is the slot we
//! are currently in. Everything here is a linear scan over that slice; no
//! sorting, so ties keep their original order.

use crate::engine::Tuning;

/// Summary statistics over a non-empty price series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    /// Price of the current slot (index 0)
    pub current: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    /// `max - min`
    pub span: f64,
    /// First index holding the minimum price
    pub cheapest_index: usize,
}

impl PriceStats {
    /// Compute statistics, or `None` for an empty series
    pub fn from_prices(prices: &[f64]) -> Option<Self> {
        let (&current, _) = prices.split_first()?;

        let mut min = current;
        let mut max = current;
        let mut cheapest_index = 0;
        let mut sum = 0.0;
        for (idx, &price) in prices.iter().enumerate() {
            sum += price;
            // strict comparison keeps the earliest slot on ties
            if price < min {
                min = price;
                cheapest_index = idx;
            }
            if price > max {
                max = price;
            }
        }

        Some(Self {
            current,
            min,
            max,
            avg: sum / prices.len() as f64,
            span: max - min,
            cheapest_index,
        })
    }

    /// Whether the cheapest slot is still ahead of us
    pub const fn cheapest_in_future(&self) -> bool {
        self.cheapest_index > 0
    }

    /// Expensive threshold adapted to the spread of this series, never below
    /// the configured `floor`
    pub fn dynamic_expensive(&self, floor: f64, span_factor: f64) -> f64 {
        floor.max(self.avg + self.span * span_factor)
    }
}

/// Indices of every slot priced at or above `threshold`, in forecast order
pub fn peak_slots(prices: &[f64], threshold: f64) -> Vec<usize> {
    prices
        .iter()
        .enumerate()
        .filter(|(_, price)| **price >= threshold)
        .map(|(idx, _)| idx)
        .collect()
}

/// Human-readable per-slot overview of a forecast
///
/// Each slot is rated PEAK (at or above the dynamic threshold), CHEAPEST
/// (equal to the series minimum) or NORMAL. Prices carry `currency` per kWh.
pub fn overview(
    prices: &[f64],
    expensive_threshold: f64,
    tuning: &Tuning,
    currency: &str,
) -> String {
    let Some(stats) = PriceStats::from_prices(prices) else {
        return "Price overview: no price data available".to_string();
    };
    let dynamic = stats.dynamic_expensive(expensive_threshold, tuning.span_factor);

    let mut lines = vec![format!(
        "Price overview ({currency}/kWh) | slots={} avg={:.4} span={:.4} dynamic_expensive={:.4}",
        prices.len(),
        stats.avg,
        stats.span,
        dynamic
    )];
    for (idx, price) in prices.iter().enumerate() {
        let rating = if *price >= dynamic {
            "PEAK"
        } else if *price <= stats.min {
            "CHEAPEST"
        } else {
            "NORMAL"
        };
        let offset = idx as u64 * u64::from(tuning.slot_minutes);
        let marker = if idx == 0 { "  <- now" } else { "" };
        lines.push(format!(
            "  +{offset}m  price={price:.4}{currency}  rating={rating}{marker}"
        ));
    }
    lines.join("\n")
}
