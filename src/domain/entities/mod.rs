//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod message;

pub use command::{Command, CommandHandler, CommandRegistry, Invocation, SharedRegistry};
pub use message::{InboundEvent, ParsedMessage};
