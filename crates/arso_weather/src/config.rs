//! Configuration file parsing and structures.
//!
//! arso_weather uses TOML for declarative configuration. Every key has a
//! default, so an empty file (or no file at all) polls Ljubljana Bežigrad.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;

use crate::feed::client;

/// Top-level configuration structure
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub station: StationConfig,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub level: LogLevel,

    /// Per-target levels, e.g. `"arso_weather::bulletin" = "debug"`
    #[serde(default)]
    pub overrides: HashMap<String, LogLevel>,
}

impl LoggingConfig {
    /// Build a tracing filter from the default level and per-target overrides
    pub fn targets(&self) -> Targets {
        self.overrides
            .iter()
            .fold(Targets::new().with_default(self.level), |targets, (target, level)| {
                targets.with_target(target.clone(), *level)
            })
    }
}

fn default_station_id() -> String {
    "LJUBL-ANA_BEZIGRAD".to_string()
}

fn default_name() -> String {
    "ARSO Weather".to_string()
}

fn default_forecast_region() -> String {
    "OSREDNJESLOVENSKA".to_string()
}

fn default_base_url() -> String {
    client::DEFAULT_BASE_URL.to_string()
}

fn default_scan_interval_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// The ARSO station to poll
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationConfig {
    /// ARSO station identifier, as used in the observation feed URL
    #[serde(default = "default_station_id")]
    pub id: String,

    /// Display name of the weather entity
    #[serde(default = "default_name")]
    pub name: String,

    /// Forecast region, as used in the forecast feed URL
    #[serde(default = "default_forecast_region")]
    pub forecast_region: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            id: default_station_id(),
            name: default_name(),
            forecast_region: default_forecast_region(),
            base_url: default_base_url(),
            scan_interval_secs: default_scan_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl StationConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn observation_url(&self) -> String {
        client::observation_url(&self.base_url, &self.id)
    }

    pub fn forecast_url(&self) -> String {
        client::forecast_url(&self.base_url, &self.forecast_region)
    }

    /// Entity id derived from the station, e.g. `weather.arso_ljubl_ana_bezigrad`
    pub fn entity_id(&self) -> String {
        let slug: String = self
            .id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("weather.arso_{}", slug)
    }

    /// Reject settings the poller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::Invalid("station.id must not be empty".to_string()));
        }
        if self.forecast_region.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "station.forecast_region must not be empty".to_string(),
            ));
        }
        if self.scan_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "station.scan_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "station.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().to_path_buf(), e))?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.station.validate()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.station.id, "LJUBL-ANA_BEZIGRAD");
        assert_eq!(config.station.forecast_region, "OSREDNJESLOVENSKA");
        assert_eq!(config.station.scan_interval(), Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [logging]
            level = "debug"

            [logging.overrides]
            "arso_weather::feed" = "trace"

            [station]
            id = "KREDARICA"
            name = "Kredarica"
            forecast_region = "GORENJSKA"
            base_url = "http://localhost:8080"
            scan_interval_secs = 300
            request_timeout_secs = 5
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(
            config.logging.overrides.get("arso_weather::feed"),
            Some(&LogLevel::Trace)
        );
        assert_eq!(config.station.name, "Kredarica");
        assert_eq!(config.station.request_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.station.observation_url(),
            "http://localhost:8080/observ/surface/text/sl/observation_KREDARICA_latest.rss"
        );
        assert_eq!(
            config.station.forecast_url(),
            "http://localhost:8080/fproduct/text/sl/fcast_SI_GORENJSKA_latest.rss"
        );
    }

    #[test]
    fn test_invalid_log_level() {
        let result: Result<Config, _> = toml::from_str("[logging]\nlevel = \"loud\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config: Config = toml::from_str("[station]\nscan_interval_secs = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_empty_station() {
        let config: Config = toml::from_str("[station]\nid = \"  \"\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_station_validate_zero_timeout() {
        let station = StationConfig {
            request_timeout_secs: 0,
            ..StationConfig::default()
        };
        assert!(matches!(station.validate(), Err(ConfigError::Invalid(_))));
        assert!(StationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_entity_id() {
        let station = StationConfig::default();
        assert_eq!(station.entity_id(), "weather.arso_ljubl_ana_bezigrad");
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("arso-weather.toml");
        fs::write(
            &path,
            r#"
            [station]
            id = "CELJE"
            "#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.station.id, "CELJE");
        assert_eq!(config.station.name, "ARSO Weather");
    }

    #[test]
    fn test_from_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::from_file(temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_, _))));
    }

    #[test]
    fn test_from_file_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[station]\nrequest_timeout_secs = 0\n").unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
