//! Command parser - Turns raw message text into a command invocation

use crate::domain::entities::{Invocation, ParsedMessage};

/// Default command marker
pub const DEFAULT_PREFIX: char = '!';

/// Parses `!command args` text into structured invocations
#[derive(Debug, Clone, Copy)]
pub struct CommandParser {
    prefix: char,
}

impl CommandParser {
    pub fn new(prefix: char) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// Parse a text message.
    ///
    /// Only the first space separates the command from its arguments, the
    /// argument string is kept exactly as sent.
    pub fn parse(&self, text: &str, sender: &str) -> ParsedMessage {
        let Some(body) = text.strip_prefix(self.prefix) else {
            return ParsedMessage::NotACommand(text.to_string());
        };

        let (name, args) = body.split_once(' ').unwrap_or((body, ""));

        ParsedMessage::Command(Invocation::new(name.to_lowercase(), args, sender))
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}
