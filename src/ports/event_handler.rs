//! EventHandler port - Side effects triggered by dispatched outbox events.

use async_trait::async_trait;

use crate::domain::events::RegisteredEvent;
use crate::domain::foundation::ErrorDetail;

/// Handler for processing a dispatched domain event.
///
/// Delivery is at-least-once, so implementations should tolerate seeing
/// the same event more than once. Returning an error leaves the outbox
/// record undelivered and it is retried on a later tick.
///
/// # Example
///
/// ```ignore
/// struct WelcomeMailer { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for WelcomeMailer {
///     async fn handle(&self, event: &RegisteredEvent) -> Result<(), ErrorDetail> {
///         let RegisteredEvent::UserCreated(created) = event;
///         // Send the mail...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "WelcomeMailer"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &RegisteredEvent) -> Result<(), ErrorDetail>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}
