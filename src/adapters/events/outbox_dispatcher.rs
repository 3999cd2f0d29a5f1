//! OutboxDispatcher - Background job that delivers outbox records.
//!
//! The second half of the transactional outbox:
//! 1. The Unit of Work writes events to the outbox with the aggregate change
//! 2. **OutboxDispatcher polls the outbox and invokes the handlers** ← This module
//!
//! Delivery is at-least-once. A record is marked delivered only after every
//! handler succeeded; otherwise its attempt count and last error are stored
//! and it is picked up again on a later tick.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 10s | How often to check for undelivered records |
//! | `batch_size` | unbounded | Max records per tick |
//! | `max_attempts` | unbounded | Records failing this often are no longer fetched |
//!
//! ## Concurrency
//!
//! Ticks of one dispatcher never overlap: a tick that finds the previous one
//! still running is skipped. Running several dispatcher processes against
//! the same table is not supported, since records are not claimed before
//! dispatch.
//!
//! ## Graceful Shutdown
//!
//! `run` listens for a shutdown signal and runs one final tick before
//! returning.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::EventRegistry;
use crate::domain::events::{EventKind, RegisteredEvent};
use crate::domain::foundation::{ErrorDetail, InfrastructureError};
use crate::ports::{OutboxRecord, OutboxStore};

/// Configuration for the OutboxDispatcher job.
#[derive(Debug, Clone)]
pub struct OutboxDispatcherConfig {
    /// How often to poll for undelivered records.
    pub poll_interval: Duration,

    /// Maximum records to process per tick; `None` processes all.
    pub batch_size: Option<u32>,

    /// Stop fetching records that already failed this many times.
    pub max_attempts: Option<u32>,
}

impl Default for OutboxDispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            batch_size: None,
            max_attempts: None,
        }
    }
}

impl OutboxDispatcherConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }
}

/// Why a single record could not be delivered, or a tick could not run.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown event type '{0}'")]
    UnknownEventType(String),

    #[error("malformed payload for '{type_tag}': {source}")]
    MalformedPayload {
        type_tag: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Handler(ErrorDetail),

    #[error("outbox storage error: {0}")]
    Storage(#[from] InfrastructureError),
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Records fetched this tick.
    pub fetched: usize,
    /// Records marked delivered.
    pub delivered: usize,
    /// Records whose delivery failed and will be retried.
    pub failed: usize,
    /// True when the tick did nothing because another was still running.
    pub skipped: bool,
}

impl DispatchReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// Background job that delivers undelivered outbox records.
pub struct OutboxDispatcher {
    outbox: Arc<dyn OutboxStore>,
    registry: Arc<EventRegistry>,
    config: OutboxDispatcherConfig,
    tick_lock: Mutex<()>,
}

impl OutboxDispatcher {
    /// Create a dispatcher with default configuration.
    pub fn new(outbox: Arc<dyn OutboxStore>, registry: Arc<EventRegistry>) -> Self {
        Self::with_config(outbox, registry, OutboxDispatcherConfig::default())
    }

    pub fn with_config(
        outbox: Arc<dyn OutboxStore>,
        registry: Arc<EventRegistry>,
        config: OutboxDispatcherConfig,
    ) -> Self {
        Self {
            outbox,
            registry,
            config,
            tick_lock: Mutex::new(()),
        }
    }

    /// Run ticks on the configured interval until shutdown is signalled.
    ///
    /// Tick failures are logged and the loop keeps going. A dropped
    /// shutdown sender counts as a shutdown signal.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "Outbox dispatcher started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        // Deliver what is already committed before stopping
                        self.tick().await;
                        info!("Outbox dispatcher stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// Process one batch of undelivered records.
    ///
    /// Only a failed fetch fails the tick. A record whose handlers or
    /// storage update fail is counted in `failed` and the tick moves on.
    pub async fn execute(&self) -> Result<DispatchReport, DispatchError> {
        let Ok(_guard) = self.tick_lock.try_lock() else {
            debug!("Previous outbox tick still running, skipping");
            return Ok(DispatchReport::skipped());
        };

        let records = self
            .outbox
            .fetch_undelivered(self.config.batch_size, self.config.max_attempts)
            .await?;
        let mut report = DispatchReport {
            fetched: records.len(),
            ..DispatchReport::default()
        };

        for record in records {
            match self.deliver(&record).await {
                Ok(true) => report.delivered += 1,
                Ok(false) => {
                    debug!(record_id = %record.id, "Outbox record was already delivered");
                }
                Err(err) => {
                    warn!(
                        record_id = %record.id,
                        type_tag = %record.type_tag,
                        attempts = record.attempts + 1,
                        error = %err,
                        "Outbox delivery failed"
                    );
                    if let Err(store_err) =
                        self.outbox.record_failure(record.id, &err.to_string()).await
                    {
                        warn!(
                            record_id = %record.id,
                            error = %store_err,
                            "Could not record outbox delivery failure"
                        );
                    }
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Dispatch one record and mark it delivered.
    ///
    /// Returns false when another tick marked it first.
    async fn deliver(&self, record: &OutboxRecord) -> Result<bool, DispatchError> {
        self.dispatch(record).await?;
        Ok(self.outbox.mark_delivered(record.id, Utc::now()).await?)
    }

    async fn dispatch(&self, record: &OutboxRecord) -> Result<(), DispatchError> {
        let kind = EventKind::from_tag(&record.type_tag)
            .ok_or_else(|| DispatchError::UnknownEventType(record.type_tag.clone()))?;

        let event = RegisteredEvent::decode(kind, &record.payload_json).map_err(|source| {
            DispatchError::MalformedPayload {
                type_tag: record.type_tag.clone(),
                source,
            }
        })?;

        self.registry
            .publish(&event)
            .await
            .map_err(DispatchError::Handler)?;

        debug!(record_id = %record.id, event_type = kind.tag(), "Outbox record dispatched");
        Ok(())
    }

    async fn tick(&self) {
        match self.execute().await {
            Ok(report) if report.delivered + report.failed > 0 => {
                info!(
                    delivered = report.delivered,
                    failed = report.failed,
                    "Outbox tick finished"
                );
            }
            Ok(_) => {}
            Err(err) => error!(error = %err, "Outbox tick failed"),
        }
    }
}
