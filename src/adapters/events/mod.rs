//! Event delivery adapters.
//!
//! - `EventRegistry` - Static event kind → handler mapping
//! - `OutboxDispatcher` - Background job delivering outbox records to the registry

mod outbox_dispatcher;
mod registry;

pub use outbox_dispatcher::{
    DispatchError, DispatchReport, OutboxDispatcher, OutboxDispatcherConfig,
};
pub use registry::EventRegistry;
