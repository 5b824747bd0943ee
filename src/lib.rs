//! WhatsApp command bot: webhook normalization, `!command` parsing and dispatch

pub mod application;
pub mod domain;
pub mod infrastructure;
