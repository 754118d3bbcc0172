//! JSON schema of the configuration file
//!
//! Consumed by configuration editors of the host system to render and check
//! a Hestia config before it is written.

use crate::config::Config;
use serde_json::Value;

/// JSON schema (draft 2020-12) describing [`Config`]
pub fn config_schema() -> Value {
    schemars::schema_for!(Config).to_value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_top_level_sections() {
        let schema = config_schema();
        let props = schema
            .get("properties")
            .and_then(Value::as_object)
            .unwrap();
        for key in [
            "battery",
            "pricing",
            "tuning",
            "source",
            "logging",
            "poll_interval_ms",
        ] {
            assert!(props.contains_key(key), "missing section: {key}");
        }
        let required = schema.get("required").and_then(Value::as_array).unwrap();
        assert!(required.iter().any(|v| v == "battery"));
        // tuning has a serde default, so it may be omitted
        assert!(!required.iter().any(|v| v == "tuning"));
    }
}
