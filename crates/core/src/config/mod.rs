//! 应用配置
//!
//! Configuration is layered with the `config` crate: built-in defaults, then
//! an optional TOML file, then `TSD_METRICS__*` environment variables
//! (e.g. `TSD_METRICS__METRICS__SERVICE=checkout`).

mod models;

pub use models::{LogSinkConfig, MetricsConfig, QueryLogFormat};

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogConfig;

const DEFAULT_PATHS: [&str; 3] = [
    "config/tsd-metrics.toml",
    "tsd-metrics.toml",
    "/etc/tsd-metrics/config.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub metrics: MetricsConfig,
    pub sink: LogSinkConfig,
    pub logging: LogConfig,
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let defaults = LogSinkConfig::default();
        let mut builder = ConfigBuilder::builder()
            .set_default("sink.directory", defaults.directory)?
            .set_default("sink.name", defaults.name)?
            .set_default("sink.extension", defaults.extension)?
            .set_default("sink.max_history", defaults.max_history as i64)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?;

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else if let Some(path) = DEFAULT_PATHS.iter().find(|p| Path::new(p).exists()) {
            debug!("Using default config file: {}", path);
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        } else {
            debug!("No config file found; using defaults and environment");
        }

        builder = builder.add_source(
            Environment::with_prefix("TSD_METRICS")
                .prefix_separator("__")
                .separator("__"),
        );

        let config = builder.build().context("构建配置失败")?;
        let app_config: AppConfig = config.try_deserialize().context("解析配置失败")?;

        app_config
            .sink
            .validate()
            .map_err(|e| anyhow::anyhow!("配置验证失败: {e}"))?;

        Ok(app_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::default();
        assert_eq!(config.sink.name, "query");
        assert_eq!(config.sink.extension, ".log");
        assert_eq!(config.sink.max_history, 24);
        assert_eq!(config.sink.format, QueryLogFormat::Tsd);
        assert!(config.metrics.host.is_none());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[metrics]
service = "checkout"
cluster = "checkout-us-prod"
host = "app01"

[sink]
directory = "/var/log/checkout"
format = "steno"

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.metrics.service, "checkout");
        assert_eq!(config.metrics.cluster, "checkout-us-prod");
        assert_eq!(config.metrics.host.as_deref(), Some("app01"));
        assert_eq!(config.sink.directory, "/var/log/checkout");
        assert_eq!(config.sink.name, "query");
        assert_eq!(config.sink.format, QueryLogFormat::Steno);
        assert_eq!(config.logging.level, crate::LogLevel::Debug);
        assert_eq!(config.logging.format, crate::OutputFormat::Json);
    }

    #[test]
    fn test_load_without_path_falls_back_to_defaults() {
        // No default config file exists under the crate directory.
        let config = AppConfig::load(None).unwrap();
        if std::env::var("TSD_METRICS__SINK__NAME").is_err() {
            assert_eq!(config.sink.name, "query");
        }
        assert!(config.sink.validate().is_ok());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = AppConfig::load(Some("/definitely/not/here/tsd.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_sink_rejected() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[sink]\nname = \"\"").unwrap();

        let result = AppConfig::load(file.path().to_str());
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serializes_to_toml() {
        let config = AppConfig::default();
        let rendered = toml::to_string(&config).unwrap();
        assert!(rendered.contains("[sink]"));
        assert!(rendered.contains("max_history = 24"));
    }
}
