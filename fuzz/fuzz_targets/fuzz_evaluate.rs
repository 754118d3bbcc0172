#![no_main]
use hestia::{BatteryLimits, BatteryState, evaluate, prices};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First 8 bytes are the state of charge, the rest a big-endian f64 price stream
    let mut it = data.chunks_exact(8);
    let soc = it
        .next()
        .map_or(50.0, |b| f64::from_be_bytes(b.try_into().unwrap_or([0; 8])));
    let series: Vec<f64> = it
        .map(|b| f64::from_be_bytes(b.try_into().unwrap_or([0; 8])))
        .collect();

    let limits = BatteryLimits::default();
    let decision = evaluate(&series, BatteryState::new(soc), &limits, 0.35);
    let _ = decision.explain();
    let _ = prices::overview(&series, 0.35, &hestia::Tuning::default(), "€");
});
