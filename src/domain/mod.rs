//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (Command, Invocation, InboundEvent)
//! - Traits: Abstractions for infrastructure (Notifier, WeatherService, Clock)

pub mod entities;
pub mod traits;
