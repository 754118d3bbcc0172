use crate::config::LoggingConfig;
use crate::error::{HestiaError, Result};
use tracing::Level;

/// Parse a level name; `WARNING` is accepted as an alias of `WARN`
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.trim().to_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARN" | "WARNING" => Ok(Level::WARN),
        "ERROR" => Ok(Level::ERROR),
        _ => Err(HestiaError::config(format!(
            "Invalid log level: {level_str}"
        ))),
    }
}

/// Console and file levels, each falling back to the base level
pub fn resolve_levels(config: &LoggingConfig) -> Result<(Level, Level)> {
    let base = parse_log_level(&config.level)?;
    let console = match config.console_level.as_deref() {
        Some(s) => parse_log_level(s)?,
        None => base,
    };
    let file = match config.file_level.as_deref() {
        Some(s) => parse_log_level(s)?,
        None => base,
    };
    Ok((console, file))
}

pub fn level_rank(level: Level) -> u8 {
    match level {
        Level::TRACE => 0,
        Level::DEBUG => 1,
        Level::INFO => 2,
        Level::WARN => 3,
        Level::ERROR => 4,
    }
}

/// The more verbose of two levels
pub fn min_level(a: Level, b: Level) -> Level {
    if level_rank(a) <= level_rank(b) { a } else { b }
}
