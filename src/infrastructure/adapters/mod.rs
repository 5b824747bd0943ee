//! Platform adapters

pub mod console;
pub mod whatsapp;

pub use console::ConsoleNotifier;
pub use whatsapp::WhatsAppNotifier;
