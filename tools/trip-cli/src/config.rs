//! CLI configuration.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trip_commerce::ingest::parse_date;
use trip_commerce::Currency;

/// CLI configuration file (`trip.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Storefront settings.
    #[serde(default)]
    pub storefront: StorefrontConfig,

    /// Promo evaluation settings.
    #[serde(default)]
    pub promo: PromoConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config content; the format follows the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// The storefront currency.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.storefront.currency)
            .ok_or_else(|| anyhow!("Unknown currency: {}", self.storefront.currency))
    }

    /// Fixed evaluation time, if configured.
    pub fn fixed_now(&self) -> Result<Option<DateTime<Utc>>> {
        self.promo
            .now
            .as_deref()
            .map(|raw| parse_date(raw).ok_or_else(|| anyhow!("Invalid promo.now: {}", raw)))
            .transpose()
    }
}

/// Storefront settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Currency code prices are quoted in (default: IDR).
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "IDR".to_string()
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

/// Promo evaluation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromoConfig {
    /// Evaluate promos as of this time instead of the wall clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `TRIP_LOG` is unset (default: warn).
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Generate a default trip.toml config file.
pub fn generate_default_config() -> String {
    r#"# Storefront pricing configuration

[storefront]
currency = "IDR"

[promo]
# Evaluate promo windows at a fixed time for reproducible quotes.
# now = "2024-06-15T08:30:00Z"

[logging]
level = "warn"
format = "human"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips() {
        let config = CliConfig::parse("trip.toml", &generate_default_config()).unwrap();
        assert_eq!(config.currency().unwrap(), Currency::IDR);
        assert!(config.fixed_now().unwrap().is_none());
        assert_eq!(config.logging.format, LogFormat::Human);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = CliConfig::parse("trip.toml", "").unwrap();
        assert_eq!(config.storefront.currency, "IDR");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_json_config() {
        let config = CliConfig::parse(
            "trip.json",
            r#"{"storefront": {"currency": "usd"}, "promo": {"now": "2024-06-15"}}"#,
        )
        .unwrap();
        assert_eq!(config.currency().unwrap(), Currency::USD);
        assert!(config.fixed_now().unwrap().is_some());
    }

    #[test]
    fn test_invalid_values() {
        let config = CliConfig::parse(
            "trip.toml",
            "[storefront]\ncurrency = \"XYZ\"\n[promo]\nnow = \"tomorrow\"\n",
        )
        .unwrap();
        assert!(config.currency().is_err());
        assert!(config.fixed_now().is_err());
    }
}
