use std::collections::BTreeMap;
use tracing::{Level, debug, error, info, trace, warn};

/// Context information for log messages
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Component name (e.g., "poller", "source", "cli")
    pub component: String,
    /// Id of the poll cycle being logged
    pub cycle_id: Option<String>,
    /// Additional context fields, kept sorted for stable output
    pub extra_fields: BTreeMap<String, String>,
}

impl LogContext {
    /// Create a new log context
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            cycle_id: None,
            extra_fields: BTreeMap::new(),
        }
    }

    /// Set poll cycle id
    #[must_use]
    pub fn with_cycle_id(mut self, cycle_id: String) -> Self {
        self.cycle_id = Some(cycle_id);
        self
    }

    /// Add extra field
    #[must_use]
    pub fn with_field(mut self, key: &str, value: String) -> Self {
        self.extra_fields.insert(key.to_string(), value);
        self
    }
}

/// Structured logger with context
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    pub(crate) context: LogContext,
}

impl StructuredLogger {
    /// Create a new structured logger with context
    pub const fn new(context: LogContext) -> Self {
        Self { context }
    }

    /// Emit `message` at `level`, prefixed by the context fields
    pub fn log(&self, level: Level, message: &str) {
        let fields = self.format_fields();
        match level {
            Level::ERROR => error!(%fields, "{message}"),
            Level::WARN => warn!(%fields, "{message}"),
            Level::INFO => info!(%fields, "{message}"),
            Level::DEBUG => debug!(%fields, "{message}"),
            Level::TRACE => trace!(%fields, "{message}"),
        }
    }

    pub fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    pub fn trace(&self, message: &str) {
        self.log(Level::TRACE, message);
    }

    /// `component=..[,cycle_id=..][,key=value...]`
    pub(crate) fn format_fields(&self) -> String {
        let ctx = &self.context;
        std::iter::once(format!("component={}", ctx.component))
            .chain(ctx.cycle_id.iter().map(|id| format!("cycle_id={id}")))
            .chain(ctx.extra_fields.iter().map(|(k, v)| format!("{k}={v}")))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Create a logger for a specific component
pub fn get_logger(component: &str) -> StructuredLogger {
    StructuredLogger::new(LogContext::new(component))
}
/// Create a logger with full context
pub fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(context)
}
