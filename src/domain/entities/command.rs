use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::application::errors::CommandError;

/// Command handler function type
pub type CommandHandler = Arc<dyn Fn(&Invocation) -> Result<String, CommandError> + Send + Sync>;

/// Registry shared between the dispatcher and handlers that read it (help)
pub type SharedRegistry = Arc<RwLock<CommandRegistry>>;

/// A parsed command-shaped message, built per incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: String,
    pub sender: String,
}

impl Invocation {
    pub fn new(command: impl Into<String>, args: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: args.into(),
            sender: sender.into(),
        }
    }
}

/// Represents a bot command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub handler: CommandHandler,
}

impl Command {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Invocation) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        Self {
            name: name.into().to_lowercase(),
            description: None,
            handler: Arc::new(handler),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Command registry for managing available commands.
///
/// Names are stored lowercased. Iteration follows registration order; a
/// re-registered name keeps its original position and takes the new handler.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRegistry {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Store `handler` under the lowercased `name` and hand it back.
    pub fn register(
        &mut self,
        name: &str,
        handler: CommandHandler,
        description: Option<&str>,
    ) -> CommandHandler {
        let command = Command {
            name: name.to_lowercase(),
            description: description.map(str::to_string),
            handler: handler.clone(),
        };
        self.insert(command);
        handler
    }

    pub fn register_command(&mut self, command: Command) -> CommandHandler {
        let handler = command.handler.clone();
        self.insert(Command {
            name: command.name.to_lowercase(),
            ..command
        });
        handler
    }

    fn insert(&mut self, command: Command) {
        tracing::info!("Command '{}' registered", command.name);
        match self.index.get(&command.name) {
            Some(&pos) => self.commands[pos] = command,
            None => {
                self.index.insert(command.name.clone(), self.commands.len());
                self.commands.push(command);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.index
            .get(&name.to_lowercase())
            .and_then(|&pos| self.commands.get(pos))
    }

    /// Case-insensitive handler lookup; `None` is an ordinary outcome.
    pub fn lookup(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|c| c.handler.clone())
    }

    /// `(name, description)` pairs in registration order.
    pub fn list(&self) -> Vec<(String, Option<String>)> {
        self.commands
            .iter()
            .map(|c| (c.name.clone(), c.description.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
