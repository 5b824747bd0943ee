//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub server: ServerConfig,
    pub whatsapp: WhatsAppConfig,
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    /// Single-character command marker
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Meta WhatsApp Cloud API settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WhatsAppConfig {
    pub token: Option<String>,
    pub phone_number_id: Option<String>,
    pub verify_token: String,
    pub api_version: String,
    pub api_base: String,
    pub timeout_seconds: u64,
}

/// OpenWeatherMap settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub units: String,
    pub lang: String,
    pub timeout_seconds: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "wa-command-bot".to_string(),
            prefix: "!".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            token: None,
            phone_number_id: None,
            verify_token: "token_secret_unique".to_string(),
            api_version: "v18.0".to_string(),
            api_base: "https://graph.facebook.com".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "http://api.openweathermap.org/data/2.5/weather".to_string(),
            units: "metric".to_string(),
            lang: "en".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl WhatsAppConfig {
    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.phone_number_id.is_some()
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.prefix()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override values from a variable source; empty values are ignored
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(token) = var("META_WHATSAPP_TOKEN") {
            self.whatsapp.token = Some(token);
        }
        if let Some(phone_id) = var("META_WHATSAPP_PHONE_ID") {
            self.whatsapp.phone_number_id = Some(phone_id);
        }
        if let Some(verify) = var("META_VERIFY_TOKEN") {
            self.whatsapp.verify_token = verify;
        }
        if let Some(version) = var("META_API_VERSION") {
            self.whatsapp.api_version = version;
        }
        if let Some(key) = var("WEATHER_API_KEY") {
            self.weather.api_key = Some(key);
        }
        if let Some(port) = var("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(prefix) = var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }
    }

    /// The command marker as a single character
    pub fn prefix(&self) -> Result<char, ConfigError> {
        let mut chars = self.bot.prefix.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() => Ok(c),
            _ => Err(ConfigError::InvalidValue(format!(
                "bot.prefix must be a single non-space character, got {:?}",
                self.bot.prefix
            ))),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.prefix().unwrap(), '!');
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.whatsapp.api_version, "v18.0");
        assert_eq!(config.whatsapp.verify_token, "token_secret_unique");
        assert!(!config.whatsapp.is_configured());
        assert!(config.weather.api_key.is_none());
        assert_eq!(config.listen_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "bot:\n  name: test-bot\nwhatsapp:\n  phone-number-id: \"123\"\n  token: abc\nweather:\n  lang: fr\n",
        )
        .unwrap();
        assert_eq!(config.bot.name, "test-bot");
        assert_eq!(config.bot.prefix, "!");
        assert!(config.whatsapp.is_configured());
        assert_eq!(config.weather.lang, "fr");
        assert_eq!(config.weather.units, "metric");
    }

    #[test]
    fn test_default_config_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("verify-token"));
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("META_WHATSAPP_TOKEN", "tok"),
            ("META_WHATSAPP_PHONE_ID", "42"),
            ("META_VERIFY_TOKEN", "verify"),
            ("WEATHER_API_KEY", ""),
            ("PORT", "8080"),
            ("BOT_PREFIX", "/"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.whatsapp.token.as_deref(), Some("tok"));
        assert_eq!(config.whatsapp.phone_number_id.as_deref(), Some("42"));
        assert_eq!(config.whatsapp.verify_token, "verify");
        assert_eq!(config.whatsapp.api_version, "v18.0");
        assert!(config.weather.api_key.is_none());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.prefix().unwrap(), '/');
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = Config::default();
        config.apply_env_from(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_invalid_prefix_is_rejected() {
        assert!(Config::from_yaml("bot:\n  prefix: \"!!\"\n").is_err());
        assert!(Config::from_yaml("bot:\n  prefix: \"\"\n").is_err());
        assert!(Config::from_yaml("bot:\n  prefix: \" \"\n").is_err());
        assert!(matches!(
            Config::from_yaml("server: [1, 2]"),
            Err(ConfigError::Parse(_))
        ));
    }
}
