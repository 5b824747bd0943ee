use async_trait::async_trait;
use crate::application::errors::BotError;

/// Notifier trait - abstraction for outbound message delivery
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a plain text message to a recipient
    async fn send_text(&self, recipient: &str, body: &str) -> Result<(), BotError>;

    /// Platform name, used in logs
    fn name(&self) -> &str;
}
