//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::errors::BotError;
use crate::application::services::MessageService;
use crate::domain::entities::InboundEvent;
use crate::domain::traits::Notifier;

/// Sender id used for messages typed on stdin
pub const CONSOLE_SENDER: &str = "console";

/// Prints replies to stdout
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send_text(&self, _recipient: &str, body: &str) -> Result<(), BotError> {
        println!("[BOT] {}", body);
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Read stdin line by line and answer each line as a message
pub async fn run_console(messages: &MessageService) -> Result<(), BotError> {
    tracing::info!("Starting console bot (dev mode), Ctrl-D to quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BotError::Internal(format!("stdin: {}", e)))?
    {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        messages
            .handle_event(InboundEvent::text(CONSOLE_SENDER, text))
            .await;
    }

    Ok(())
}
