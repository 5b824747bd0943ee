//! Message dispatcher - Routes parsed messages to command handlers

use std::panic::{self, AssertUnwindSafe};

use super::parser::CommandParser;
use crate::application::errors::CommandError;
use crate::domain::entities::{CommandHandler, Invocation, ParsedMessage, SharedRegistry};

/// Reply used when a handler fails; failure details stay in the logs
pub const FALLBACK_REPLY: &str = "Sorry, an error occurred while retrieving the data.";

/// Resolves invocations against the registry and runs the handler.
///
/// Stateless per call: the registry is only read, and the read lock is
/// released before the handler runs so handlers may read the registry too.
#[derive(Clone)]
pub struct Dispatcher {
    parser: CommandParser,
    registry: SharedRegistry,
}

impl Dispatcher {
    pub fn new(parser: CommandParser, registry: SharedRegistry) -> Self {
        Self { parser, registry }
    }

    /// Parse and dispatch a raw text message
    pub fn dispatch_text(&self, text: &str, sender: &str) -> String {
        self.dispatch(self.parser.parse(text, sender))
    }

    pub fn dispatch(&self, message: ParsedMessage) -> String {
        match message {
            ParsedMessage::NotACommand(_) => self.default_reply(),
            ParsedMessage::Command(invocation) => self.dispatch_invocation(&invocation),
        }
    }

    /// Reply for every message that is not a command
    pub fn default_reply(&self) -> String {
        format!(
            "Hello! I am a WhatsApp bot. Send {}help to see the available commands.",
            self.parser.prefix()
        )
    }

    pub fn unknown_command_reply(&self, name: &str) -> String {
        format!(
            "unknown command: {}, send {}help to see available commands",
            name,
            self.parser.prefix()
        )
    }

    fn dispatch_invocation(&self, invocation: &Invocation) -> String {
        let handler = match self.lookup(&invocation.command) {
            Ok(Some(handler)) => handler,
            Ok(None) => return self.unknown_command_reply(&invocation.command),
            Err(e) => {
                tracing::error!("Registry unavailable: {}", e);
                return FALLBACK_REPLY.to_string();
            }
        };

        tracing::info!("Executing command '{}' for {}", invocation.command, invocation.sender);

        match panic::catch_unwind(AssertUnwindSafe(|| handler(invocation))) {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                tracing::warn!("Command '{}' failed: {}", invocation.command, e);
                FALLBACK_REPLY.to_string()
            }
            Err(_) => {
                tracing::error!("Command '{}' panicked", invocation.command);
                FALLBACK_REPLY.to_string()
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<Option<CommandHandler>, CommandError> {
        let registry = self
            .registry
            .read()
            .map_err(|_| CommandError::Internal("Lock poisoned".to_string()))?;
        Ok(registry.lookup(name))
    }
}
