//! Domain traits - Abstractions for infrastructure implementations

pub mod capabilities;
pub mod notifier;

pub use capabilities::{Capabilities, Clock, RandomSource, WeatherReport, WeatherService};
pub use notifier::Notifier;
