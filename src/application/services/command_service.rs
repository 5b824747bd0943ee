use std::sync::Arc;

use crate::application::commands;
use crate::application::errors::CommandError;
use crate::application::messaging::{CommandParser, Dispatcher};
use crate::domain::entities::{CommandHandler, CommandRegistry, Invocation, SharedRegistry};
use crate::domain::traits::Capabilities;

/// Service for managing and executing commands
#[derive(Clone)]
pub struct CommandService {
    registry: SharedRegistry,
    parser: CommandParser,
}

impl CommandService {
    pub fn new(prefix: char) -> Self {
        Self {
            registry: CommandRegistry::shared(),
            parser: CommandParser::new(prefix),
        }
    }

    /// Register the built-in command set
    pub fn register_defaults(&self, caps: &Capabilities) -> Result<(), CommandError> {
        commands::register_builtins(&self.registry, self.parser.prefix(), caps)
    }

    /// Register a command at any point after construction.
    ///
    /// Returns the handler so callers can keep composing with it.
    pub fn add_command<F>(
        &self,
        name: &str,
        description: &str,
        handler: F,
    ) -> Result<CommandHandler, CommandError>
    where
        F: Fn(&Invocation) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        let mut registry = self
            .registry
            .write()
            .map_err(|_| CommandError::Internal("Lock poisoned".to_string()))?;
        Ok(registry.register(name, Arc::new(handler), Some(description)))
    }

    /// Names of the registered commands, in registration order
    pub fn command_names(&self) -> Vec<String> {
        match self.registry.read() {
            Ok(registry) => registry.list().into_iter().map(|(name, _)| name).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.parser, self.registry.clone())
    }

    pub fn prefix(&self) -> char {
        self.parser.prefix()
    }
}
