//! WhatsApp Cloud API adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::application::errors::{BotError, ConfigError};
use crate::domain::traits::Notifier;
use crate::infrastructure::config::WhatsAppConfig;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    messaging_product: &'static str,
    recipient_type: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

/// Sends text replies through the Graph API `messages` endpoint
pub struct WhatsAppNotifier {
    client: Client,
    config: WhatsAppConfig,
}

impl WhatsAppNotifier {
    pub fn new(config: WhatsAppConfig) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| BotError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the messages URL for the configured phone number
    fn messages_url(&self, phone_number_id: &str) -> String {
        format!(
            "{}/{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.api_version,
            phone_number_id
        )
    }

    /// International format without the leading `+`
    fn normalize_recipient(recipient: &str) -> &str {
        recipient.strip_prefix('+').unwrap_or(recipient)
    }
}

#[async_trait]
impl Notifier for WhatsAppNotifier {
    async fn send_text(&self, recipient: &str, body: &str) -> Result<(), BotError> {
        let (Some(token), Some(phone_number_id)) =
            (&self.config.token, &self.config.phone_number_id)
        else {
            return Err(ConfigError::InvalidValue(
                "WhatsApp token and phone number id are required".to_string(),
            )
            .into());
        };

        let to = Self::normalize_recipient(recipient);
        let request = SendMessageRequest {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to,
            kind: "text",
            text: TextBody { body },
        };

        tracing::debug!("Sending to {}: {}", to, body);

        let response = self
            .client
            .post(self.messages_url(phone_number_id))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(BotError::Delivery(format!("WhatsApp API error {}: {}", status, error)));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "whatsapp"
    }
}
