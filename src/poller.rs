//! Periodic decision driver
//!
//! Each cycle takes one snapshot from the configured [`InputSource`], runs the
//! engine and publishes a [`DecisionRecord`] on a watch channel. Only the
//! latest record is kept.

use crate::config::Config;
use crate::engine::{Decision, Status, evaluate_with};
use crate::logging::{LogContext, StructuredLogger, get_logger, get_logger_with_context};
use crate::source::{InputSnapshot, InputSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::time::{Duration, MissedTickBehavior, interval};

/// A decision together with the poll cycle that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: String,
    pub timestamp: String,
    pub decision: Decision,
    /// State of charge the decision was based on; `None` when the snapshot failed
    pub soc: Option<f64>,
    pub slot_count: usize,
    pub poll_duration_ms: u64,
    pub total_polls: u64,
}

pub type RecordReceiver = watch::Receiver<Option<Arc<DecisionRecord>>>;

pub struct DecisionPoller {
    config: Config,
    source: Arc<dyn InputSource>,
    logger: StructuredLogger,
    record_tx: watch::Sender<Option<Arc<DecisionRecord>>>,
    last_status: Option<Status>,
    total_polls: u64,
    overrun_count: u64,
}

impl DecisionPoller {
    pub fn new(config: Config, source: Arc<dyn InputSource>) -> Self {
        let (record_tx, _) = watch::channel(None);
        Self {
            config,
            source,
            logger: get_logger("poller"),
            record_tx,
            last_status: None,
            total_polls: 0,
            overrun_count: 0,
        }
    }

    /// Observe published records; the receiver sees `None` until the first cycle
    pub fn subscribe(&self) -> RecordReceiver {
        self.record_tx.subscribe()
    }

    pub fn latest(&self) -> Option<Arc<DecisionRecord>> {
        self.record_tx.borrow().clone()
    }

    pub const fn total_polls(&self) -> u64 {
        self.total_polls
    }

    pub const fn overrun_count(&self) -> u64 {
        self.overrun_count
    }

    async fn take_snapshot(&self) -> crate::error::Result<InputSnapshot> {
        let snapshot = self.source.snapshot().await?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Run one cycle and publish its record
    pub async fn poll_once(&mut self) -> Arc<DecisionRecord> {
        let started = Instant::now();

        let (decision, soc, slot_count) = match self.take_snapshot().await {
            Ok(snapshot) => {
                let decision = evaluate_with(
                    &snapshot.prices,
                    snapshot.battery_state(),
                    &self.config.battery,
                    self.config.pricing.expensive_threshold,
                    &self.config.tuning,
                );
                (decision, Some(snapshot.soc), snapshot.prices.len())
            }
            Err(e) => {
                self.logger.warn(&format!(
                    "Snapshot from {} source unusable, treating as missing data: {}",
                    self.source.name(),
                    e
                ));
                (Decision::data_missing(), None, 0)
            }
        };

        self.total_polls = self.total_polls.saturating_add(1);
        let record = Arc::new(DecisionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            decision,
            soc,
            slot_count,
            poll_duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            total_polls: self.total_polls,
        });

        let cycle_logger =
            get_logger_with_context(LogContext::new("poller").with_cycle_id(record.id.clone()));
        let explanation = record.decision.explain();
        if self.last_status == Some(record.decision.status) {
            cycle_logger.debug(&explanation);
        } else {
            cycle_logger.info(&format!("Decision changed: {explanation}"));
        }
        self.last_status = Some(record.decision.status);

        self.record_tx.send_replace(Some(Arc::clone(&record)));
        record
    }

    /// Poll on the configured interval until `shutdown` turns true or its
    /// sender is dropped
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        let period = Duration::from_millis(self.config.poll_interval_ms.max(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.logger.info(&format!(
            "Starting decision poller: interval={}ms source={}",
            period.as_millis(),
            self.source.name()
        ));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let started = Instant::now();
                    self.poll_once().await;
                    let elapsed = started.elapsed();
                    if elapsed > period {
                        self.overrun_count = self.overrun_count.saturating_add(1);
                        self.logger.warn(&format!(
                            "Poll cycle took {}ms, longer than the {}ms interval (overruns={})",
                            elapsed.as_millis(),
                            period.as_millis(),
                            self.overrun_count
                        ));
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.logger.info(&format!(
            "Decision poller stopped after {} polls",
            self.total_polls
        ));
    }
}
