use std::sync::Arc;

use serde_json::Value;

use crate::application::messaging::{extract_message, Dispatcher, FALLBACK_REPLY};
use crate::domain::entities::InboundEvent;
use crate::domain::traits::Notifier;

/// What happened to a webhook payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// No message in the payload (receipts, partial payloads)
    Ignored,
    /// A message arrived but is not text
    Skipped,
    /// A reply was computed and handed to the notifier
    Replied { recipient: String, delivered: bool },
}

impl WebhookOutcome {
    pub fn had_message(&self) -> bool {
        !matches!(self, WebhookOutcome::Ignored)
    }
}

/// Service for processing inbound messages
#[derive(Clone)]
pub struct MessageService {
    dispatcher: Dispatcher,
    notifier: Arc<dyn Notifier>,
}

impl MessageService {
    pub fn new(dispatcher: Dispatcher, notifier: Arc<dyn Notifier>) -> Self {
        Self { dispatcher, notifier }
    }

    /// Normalize a webhook payload and answer the message it carries
    pub async fn handle_payload(&self, payload: &Value) -> WebhookOutcome {
        let Some(event) = extract_message(payload) else {
            return WebhookOutcome::Ignored;
        };
        self.handle_event(event).await
    }

    pub async fn handle_event(&self, event: InboundEvent) -> WebhookOutcome {
        let Some(text) = event.text else {
            tracing::debug!("Skipping non-text message from {}", event.sender_id);
            return WebhookOutcome::Skipped;
        };

        tracing::info!("Message received from {}: {}", event.sender_id, text);

        let reply = self.reply_to(text, event.sender_id.clone()).await;
        let delivered = self.deliver(&event.sender_id, &reply).await;

        WebhookOutcome::Replied {
            recipient: event.sender_id,
            delivered,
        }
    }

    /// Compute the reply off the async runtime; handlers may block on I/O
    pub async fn reply_to(&self, text: String, sender: String) -> String {
        let dispatcher = self.dispatcher.clone();
        match tokio::task::spawn_blocking(move || dispatcher.dispatch_text(&text, &sender)).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Dispatch task failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }

    /// Send a reply; failures are logged, never retried
    pub async fn deliver(&self, recipient: &str, text: &str) -> bool {
        match self.notifier.send_text(recipient, text).await {
            Ok(()) => {
                tracing::info!("Message sent to {} via {}", recipient, self.notifier.name());
                true
            }
            Err(e) => {
                tracing::error!("Failed to send message to {}: {}", recipient, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::application::commands::testing::{capabilities, sunny, StubWeather};
    use crate::application::errors::BotError;
    use crate::application::services::CommandService;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_text(&self, recipient: &str, body: &str) -> Result<(), BotError> {
            self.sent.lock().unwrap().push((recipient.to_string(), body.to_string()));
            if self.fail {
                return Err(BotError::Delivery("HTTP 500".to_string()));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn service(notifier: Arc<RecordingNotifier>) -> MessageService {
        let commands = CommandService::new('!');
        commands
            .register_defaults(&capabilities(Arc::new(StubWeather::new(sunny()))))
            .unwrap();
        MessageService::new(commands.dispatcher(), notifier)
    }

    fn payload(message: Value) -> Value {
        json!({
            "object": "whatsapp_business_account",
            "entry": [{ "changes": [{ "value": { "messages": [message] } }] }]
        })
    }

    #[tokio::test]
    async fn test_text_message_gets_reply() {
        let notifier = Arc::new(RecordingNotifier::default());
        let outcome = service(notifier.clone())
            .handle_payload(&payload(json!({
                "from": "33612345678",
                "type": "text",
                "text": { "body": "!echo hello world" }
            })))
            .await;

        assert_eq!(
            outcome,
            WebhookOutcome::Replied {
                recipient: "33612345678".to_string(),
                delivered: true
            }
        );
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(*sent, vec![("33612345678".to_string(), "You said: hello world".to_string())]);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported_not_raised() {
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let outcome = service(notifier.clone())
            .handle_event(InboundEvent::text("33612345678", "hi"))
            .await;

        assert!(matches!(outcome, WebhookOutcome::Replied { delivered: false, .. }));
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_text_message_is_skipped() {
        let notifier = Arc::new(RecordingNotifier::default());
        let outcome = service(notifier.clone())
            .handle_payload(&payload(json!({ "from": "33612345678", "type": "location" })))
            .await;

        assert_eq!(outcome, WebhookOutcome::Skipped);
        assert!(outcome.had_message());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_receipt_is_ignored() {
        let notifier = Arc::new(RecordingNotifier::default());
        let outcome = service(notifier.clone())
            .handle_payload(&json!({ "object": "whatsapp_business_account", "entry": [] }))
            .await;

        assert_eq!(outcome, WebhookOutcome::Ignored);
        assert!(!outcome.had_message());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }
}
