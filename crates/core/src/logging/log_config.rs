use crate::logging::log_level::LogLevel;

/// Logging configuration
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: LogLevel,
    /// Output format for logs
    pub format: OutputFormat,
}

/// Output format for log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// Plain text format
    Text,
    /// Pretty-printed output
    #[default]
    Pretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::errors::MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            "pretty" => Ok(OutputFormat::Pretty),
            _ => Err(crate::errors::MetricsError::Configuration(format!(
                "Invalid output format: {s}. Valid formats: json, text, pretty"
            ))),
        }
    }
}

impl LogConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `LOG_LEVEL` / `LOG_FORMAT` on top of this configuration.
    /// Unset or unparseable values leave the current setting in place.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = lookup("LOG_LEVEL").and_then(|v| v.parse::<LogLevel>().ok()) {
            self.level = level;
        }

        if let Some(format) = lookup("LOG_FORMAT").and_then(|v| v.parse::<OutputFormat>().ok()) {
            self.format = format;
        }

        self
    }

    /// Create configuration with custom settings
    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Set output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
