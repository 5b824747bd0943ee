//! Message handling - Webhook normalization, parsing and dispatch

pub mod dispatcher;
pub mod normalizer;
pub mod parser;

pub use dispatcher::{Dispatcher, FALLBACK_REPLY};
pub use normalizer::{extract_message, normalize};
pub use parser::{CommandParser, DEFAULT_PREFIX};
