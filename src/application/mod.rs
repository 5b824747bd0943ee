//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Commands: The built-in command set
//! - Services: Command registration and message processing
//! - Errors: Domain-specific errors
//! - Messaging: Webhook normalization, parsing, dispatching

pub mod commands;
pub mod context;
pub mod errors;
pub mod messaging;
pub mod services;

pub use context::AppContext;
