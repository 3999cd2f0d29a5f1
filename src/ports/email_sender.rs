//! Email sender port.

use async_trait::async_trait;

/// Outbound email transport.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send an HTML email. Returns false if the transport did not accept it.
    ///
    /// Transport errors are reported as `false`; implementations log the
    /// cause themselves.
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool;
}
