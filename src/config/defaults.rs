use super::*;

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            expensive_threshold: 0.35,
            currency_symbol: "€".to_string(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: "/data/hestia_inputs.yaml".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "/tmp/hestia.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            battery: BatteryLimits::default(),
            pricing: PricingConfig::default(),
            tuning: Tuning::default(),
            source: SourceConfig::default(),
            logging: LoggingConfig::default(),
            poll_interval_ms: 30_000,
        }
    }
}
