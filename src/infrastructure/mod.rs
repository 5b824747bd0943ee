//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Platform integrations (WhatsApp, console)
//! - Http: Webhook server
//! - Weather: OpenWeatherMap client
//! - System: Clock and random source

pub mod adapters;
pub mod config;
pub mod http;
pub mod system;
pub mod weather;
