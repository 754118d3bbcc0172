//! # Hestia - price-driven decision engine for home batteries
//!
//! Given a short-term electricity price forecast and the current battery
//! state, Hestia recommends whether the battery should stand by, charge or
//! discharge right now.
//!
//! ## Architecture
//!
//! - `engine`: the pure decision function and its result types
//! - `prices`: statistics over a price forecast
//! - `battery`: battery state and configured limits
//! - `config`: YAML configuration and validation
//! - `schema`: JSON schema of the configuration
//! - `source`: input snapshot sources (file, in-memory)
//! - `poller`: periodic evaluation publishing the latest decision
//! - `logging`: structured logging and tracing
//!
//! ```
//! use hestia::{BatteryLimits, BatteryState, Status, evaluate};
//!
//! let decision = evaluate(
//!     &[0.40, 0.10, 0.41],
//!     BatteryState::new(50.0),
//!     &BatteryLimits::default(),
//!     0.35,
//! );
//! assert_eq!(decision.status, Status::ExpensiveNowDischarge);
//! ```

pub mod battery;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod poller;
pub mod prices;
pub mod schema;
pub mod source;

// Re-export commonly used types
pub use battery::{BatteryLimits, BatteryState};
pub use config::Config;
pub use engine::{Action, Decision, DecisionDebug, Status, Tuning, evaluate, evaluate_with};
pub use error::{HestiaError, Result};
pub use poller::{DecisionPoller, DecisionRecord};
pub use source::{FileSource, InputSnapshot, InputSource, StaticSource};
