use hestia::{Action, BatteryLimits, BatteryState, Status, evaluate};
use rstest::rstest;

const DAY: [f64; 5] = [0.10, 0.12, 0.40, 0.41, 0.11];
const THRESHOLD: f64 = 0.35;

fn limits() -> BatteryLimits {
    BatteryLimits {
        soc_min: 10.0,
        soc_max: 95.0,
        capacity_kwh: 10.0,
        max_charge_w: 3000.0,
        max_discharge_w: 3000.0,
    }
}

fn run(prices: &[f64], soc: f64) -> (Status, Action) {
    let d = evaluate(prices, BatteryState::new(soc), &limits(), THRESHOLD);
    (d.status, d.action)
}

#[rstest]
#[case::mid_soc(0.0)]
#[case::reserve(10.0)]
#[case::full(100.0)]
fn empty_forecast_is_data_missing(#[case] soc: f64) {
    assert_eq!(run(&[], soc), (Status::DataMissing, Action::Standby));
}

#[test]
fn cheapest_slot_now_means_charge_now() {
    let decision = evaluate(&DAY, BatteryState::new(50.0), &limits(), THRESHOLD);
    assert_eq!(decision.status, Status::CheapPhaseMissed);
    assert_eq!(decision.action, Action::Charge);

    let debug = decision.debug.unwrap();
    assert!((debug.avg - 0.228).abs() < 1e-9);
    assert!((debug.span - 0.31).abs() < 1e-9);
    assert!((debug.dynamic_expensive - 0.35).abs() < 1e-12);
    assert!(!debug.cheapest_future);
}

#[test]
fn nearly_full_battery_still_charges_when_cheapest_is_now() {
    assert_eq!(run(&DAY, 90.0), (Status::CheapPhaseMissed, Action::Charge));
}

#[test]
fn expensive_now_discharges() {
    assert_eq!(
        run(&[0.40, 0.10, 0.41], 50.0),
        (Status::ExpensiveNowDischarge, Action::Discharge)
    );
}

#[rstest]
#[case::below_floor(0.05)]
#[case::at_price(0.10)]
fn single_slot_at_reserve_protects_battery(#[case] threshold: f64) {
    let limits = limits();
    let decision = evaluate(&[0.10], BatteryState::new(5.0), &limits, threshold);
    assert_eq!(decision.status, Status::ExpensiveNowBatteryProtect);
    assert_eq!(decision.action, Action::Standby);
}

#[test]
fn cheaper_slot_ahead_waits() {
    assert_eq!(
        run(&[0.30, 0.10, 0.20], 50.0),
        (Status::CheapPhaseComing, Action::Standby)
    );
}

#[test]
fn cheapest_tie_with_current_slot_counts_as_now() {
    // slot 2 matches the current minimum but the earliest occurrence wins
    assert_eq!(
        run(&[0.10, 0.20, 0.10], 50.0),
        (Status::CheapPhaseMissed, Action::Charge)
    );
}

#[test]
fn full_battery_without_peaks_is_ok() {
    assert_eq!(run(&[0.10, 0.20], 95.0), (Status::BatteryOk, Action::Standby));
}

fn low_reserve_limits() -> BatteryLimits {
    BatteryLimits {
        soc_min: 90.0,
        ..limits()
    }
}

#[test]
fn close_peak_without_energy_needs_charge() {
    // peaks at slots 3 and 4 start in 45 min; 1 kWh missing takes ~27 min + 30 min buffer
    let decision = evaluate(
        &[0.20, 0.10, 0.20, 0.50, 0.50],
        BatteryState::new(95.0),
        &low_reserve_limits(),
        THRESHOLD,
    );
    assert_eq!(decision.status, Status::PeakComingNeedCharge);
    assert_eq!(decision.action, Action::Charge);
    let debug = decision.debug.unwrap();
    assert_eq!(debug.first_peak_index, Some(3));
    assert!((debug.missing_kwh - 1.0).abs() < 1e-9);
}

#[test]
fn distant_peak_leaves_time_to_charge_later() {
    let mut prices = vec![0.20, 0.10];
    prices.extend(std::iter::repeat_n(0.20, 18));
    prices.extend([0.50, 0.50]);
    let decision = evaluate(
        &prices,
        BatteryState::new(95.0),
        &low_reserve_limits(),
        THRESHOLD,
    );
    assert_eq!(decision.status, Status::BatteryOk);
    assert_eq!(decision.debug.unwrap().first_peak_index, Some(20));
}

#[test]
fn enough_stored_energy_for_peak_is_ok() {
    // same close peak but the default 10% reserve leaves 8.5 kWh usable
    assert_eq!(
        run(&[0.20, 0.10, 0.20, 0.50, 0.50], 95.0),
        (Status::BatteryOk, Action::Standby)
    );
}

#[rstest]
#[case::at_min_expensive(&[0.50, 0.10], 10.0, Status::ExpensiveNowBatteryProtect)]
#[case::above_min_expensive(&[0.50, 0.10], 10.5, Status::ExpensiveNowDischarge)]
#[case::at_min_cheap(&[0.10, 0.50], 10.0, Status::CheapPhaseMissed)]
#[case::at_max_cheap_ahead(&[0.20, 0.10], 95.0, Status::BatteryOk)]
#[case::below_max_cheap_ahead(&[0.20, 0.10], 94.9, Status::CheapPhaseComing)]
fn soc_boundaries(#[case] prices: &[f64], #[case] soc: f64, #[case] expected: Status) {
    assert_eq!(run(prices, soc).0, expected);
}

/// Four peak slots starting at `first_peak`, after a cheap slot at index 1
fn peak_block_at(first_peak: usize) -> Vec<f64> {
    let mut prices = vec![0.20, 0.10];
    prices.extend(std::iter::repeat_n(0.20, first_peak - 2));
    prices.extend([0.50; 4]);
    prices
}

// usable 0.75 kWh, needed 4 * 0.25 h * 3 kW = 3 kWh, so 2.25 kWh missing at
// 2.25 kW derated: exactly 60 min, plus the 30 min buffer gives 90 min
#[rstest]
#[case::well_inside(5, Status::PeakComingNeedCharge)]
#[case::exactly_at_lead_time(6, Status::PeakComingNeedCharge)]
#[case::one_slot_too_late(7, Status::BatteryOk)]
fn peak_lead_time_boundary_is_inclusive(#[case] first_peak: usize, #[case] expected: Status) {
    let decision = evaluate(
        &peak_block_at(first_peak),
        BatteryState::new(97.5),
        &low_reserve_limits(),
        THRESHOLD,
    );
    let debug = decision.debug.unwrap();
    assert_eq!(debug.first_peak_index, Some(first_peak));
    assert_eq!(debug.missing_kwh, 2.25);
    assert_eq!(debug.need_minutes, 60.0);
    assert_eq!(decision.status, expected);
}
