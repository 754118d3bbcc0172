// Only test in this binary, so nothing else reads the environment meanwhile.

use hestia::HestiaError;
use hestia::config::{CONFIG_ENV_VAR, Config};

#[test]
fn config_env_var_selects_file() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("from_env.yaml");
    let mut cfg = Config::default();
    cfg.pricing.expensive_threshold = 0.42;
    cfg.poll_interval_ms = 7_500;
    cfg.save_to_file(&path).unwrap();

    // SAFETY: single-threaded test binary
    unsafe { std::env::set_var(CONFIG_ENV_VAR, &path) };
    let loaded = Config::load().unwrap();
    assert_eq!(loaded.pricing.expensive_threshold, 0.42);
    assert_eq!(loaded.poll_interval_ms, 7_500);

    let validated = Config::load_validated(None).unwrap();
    assert_eq!(validated.poll_interval_ms, 7_500);

    // an explicit path still wins over the variable
    let other = tmp_dir.path().join("explicit.yaml");
    Config::default().save_to_file(&other).unwrap();
    let explicit = Config::load_validated(Some(&other)).unwrap();
    assert_eq!(explicit.poll_interval_ms, 30_000);

    // a variable pointing nowhere is an error, not a silent fallback
    // SAFETY: as above
    unsafe { std::env::set_var(CONFIG_ENV_VAR, tmp_dir.path().join("missing.yaml")) };
    let err = Config::load().unwrap_err();
    assert!(matches!(err, HestiaError::Io { .. }));
    assert!(Config::load_validated(None).is_err());

    // SAFETY: as above
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };
}
