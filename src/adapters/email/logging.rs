//! Email sender that only logs, for local runs without a provider key.

use async_trait::async_trait;

use crate::ports::EmailSender;

/// Writes each email to the log instead of sending it.
#[derive(Debug, Default, Clone)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool {
        tracing::info!(recipient = %to, subject = %subject, body = %html_body, "Email (not sent)");
        true
    }
}
