//! Event registry - maps each [`EventKind`] to the handlers that consume it.
//!
//! The mapping is fixed at startup: build it with [`EventRegistry::subscribe`]
//! and hand the finished registry to the dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::events::{EventKind, RegisteredEvent};
use crate::domain::foundation::{ErrorDetail, ErrorCategory};
use crate::ports::EventHandler;

/// Static kind → handler-set mapping.
///
/// # Example
///
/// ```ignore
/// let registry = EventRegistry::new()
///     .subscribe(EventKind::UserCreated, Arc::new(mailer));
///
/// registry.publish(&event).await?;
/// ```
#[derive(Default)]
pub struct EventRegistry {
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every event of `kind`.
    pub fn subscribe(mut self, kind: EventKind, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.entry(kind).or_default().push(handler);
        self
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Invoke every handler subscribed to the event's kind, in
    /// registration order.
    ///
    /// All handlers run even if one fails; failures are combined into one
    /// error naming each failing handler. An event with no subscribers is
    /// accepted.
    pub async fn publish(&self, event: &RegisteredEvent) -> Result<(), ErrorDetail> {
        let Some(handlers) = self.handlers.get(&event.kind()) else {
            debug!(event_type = event.kind().tag(), "No handlers subscribed");
            return Ok(());
        };

        let mut errors = Vec::new();
        for handler in handlers {
            if let Err(e) = handler.handle(event).await {
                errors.push(format!("{}: {}", handler.name(), e.message()));
            }
        }

        if !errors.is_empty() {
            return Err(ErrorDetail::new(
                ErrorCategory::Internal,
                format!("Handler errors: {}", errors.join(", ")),
            ));
        }

        Ok(())
    }
}
