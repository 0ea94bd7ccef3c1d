//! Service Configuration
//!
//! Layered from an optional TOML file and `EV_INSIGHT__*` environment
//! variables. Every section has defaults, so an empty configuration is
//! valid.

use config::{Config, ConfigError, Environment, File};
use insights::SelectionPolicy;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Config file used when `EV_INSIGHT_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config/service.toml";

/// Environment variable overriding the config file path
pub const CONFIG_PATH_ENV: &str = "EV_INSIGHT_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    /// Reason selection for value insights
    #[serde(default)]
    pub insights: SelectionPolicy,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// HTTP listener
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Model artifact locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Battery health classifier (ONNX)
    pub health_model_path: PathBuf,
    /// Training dataset the health labels are recovered from
    pub health_dataset_path: PathBuf,
    /// Value-for-money regressor (ONNX)
    pub value_model_path: PathBuf,
    /// JSON array of the regressor's training column names
    pub value_features_path: PathBuf,
    /// Fitted sales forecaster (JSON)
    pub sales_model_path: PathBuf,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            health_model_path: PathBuf::from("models/battery_health.onnx"),
            health_dataset_path: PathBuf::from("data/dataset.csv"),
            value_model_path: PathBuf::from("models/value_for_money.onnx"),
            value_features_path: PathBuf::from("models/value_for_money.features.json"),
            sales_model_path: PathBuf::from("models/sales_forecast.json"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive, used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Prometheus exporter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// Scrape listener address; no exporter when unset
    #[serde(default)]
    pub listen_addr: Option<SocketAddr>,
}

impl ServiceConfig {
    /// Load from `EV_INSIGHT_CONFIG` or the default path, then the
    /// environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load from a specific file (may be absent), then the environment
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("EV_INSIGHT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights::SelectionStrategy;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.address(), "0.0.0.0:5000");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.insights.strategy, SelectionStrategy::Random);
        assert!(config.metrics.listen_addr.is_none());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = ServiceConfig::load_from_path("/nonexistent/service.toml").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(
            config.models.sales_model_path,
            PathBuf::from("models/sales_forecast.json")
        );
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("service-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"
[server]
port = 8080

[models]
value_model_path = "/srv/models/value.onnx"

[insights]
strategy = "first_n"

[logging]
format = "json"

[metrics]
listen_addr = "127.0.0.1:9000"
"#,
        )
        .unwrap();

        let config = ServiceConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.models.value_model_path, PathBuf::from("/srv/models/value.onnx"));
        assert_eq!(config.models.health_model_path, PathBuf::from("models/battery_health.onnx"));
        assert_eq!(config.insights.strategy, SelectionStrategy::FirstN);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.metrics.listen_addr, Some("127.0.0.1:9000".parse().unwrap()));
        std::fs::remove_file(path).ok();
    }
}
