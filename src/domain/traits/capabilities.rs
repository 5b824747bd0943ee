use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::application::errors::WeatherError;

/// Current conditions for a location
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Temperature in degrees Celsius
    pub temperature: f64,
    pub description: String,
}

/// Weather lookup by location name
pub trait WeatherService: Send + Sync {
    fn current(&self, location: &str) -> Result<WeatherReport, WeatherError>;
}

/// Local wall clock
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Uniform choice among `len` items
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// External capabilities handed to the built-in commands
#[derive(Clone)]
pub struct Capabilities {
    pub weather: Arc<dyn WeatherService>,
    pub clock: Arc<dyn Clock>,
    pub random: Arc<dyn RandomSource>,
}

impl Capabilities {
    pub fn new(
        weather: Arc<dyn WeatherService>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self { weather, clock, random }
    }
}
