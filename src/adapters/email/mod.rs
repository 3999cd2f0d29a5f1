//! Email adapters.
//!
//! - `ResendEmailSender` - Production sender using the Resend API
//! - `LogEmailSender` - Logs instead of sending, for local development

mod logging;
mod resend;

pub use logging::LogEmailSender;
pub use resend::{ResendConfig, ResendEmailSender};
