//! OpenWeatherMap client
//!
//! Blocking on purpose: command handlers run on the blocking thread pool.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::application::errors::WeatherError;
use crate::domain::traits::{WeatherReport, WeatherService};
use crate::infrastructure::config::WeatherConfig;

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

pub struct OpenWeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent(concat!("wa-command-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

impl WeatherService for OpenWeatherClient {
    fn current(&self, location: &str) -> Result<WeatherReport, WeatherError> {
        let api_key = self.api_key().ok_or(WeatherError::NotConfigured)?;

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("q", location),
                ("appid", api_key),
                ("units", self.config.units.as_str()),
                ("lang", self.config.lang.as_str()),
            ])
            .send()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(WeatherError::NotFound(location.to_string())),
            status => return Err(WeatherError::Status(status.as_u16())),
        }

        let data: CurrentWeather = response
            .json()
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let description = data
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| WeatherError::Parse("missing weather description".to_string()))?;

        Ok(WeatherReport {
            temperature: data.main.temp,
            description,
        })
    }
}
