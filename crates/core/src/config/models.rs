use serde::{Deserialize, Serialize};

/// Labels applied to every event produced by a factory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub service: String,
    pub cluster: String,
    /// Falls back to the local hostname when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// Layout of each line written by the query log sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryLogFormat {
    /// Bare query log body, one JSON object per event.
    #[default]
    Tsd,
    /// Query log body wrapped in a steno envelope.
    Steno,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSinkConfig {
    pub directory: String,
    /// File name without extension; cannot be empty.
    pub name: String,
    pub extension: String,
    /// Number of rotated files to retain.
    pub max_history: usize,
    pub format: QueryLogFormat,
}

impl Default for LogSinkConfig {
    fn default() -> Self {
        Self {
            directory: "./".to_string(),
            name: "query".to_string(),
            extension: ".log".to_string(),
            max_history: 24,
            format: QueryLogFormat::Tsd,
        }
    }
}

impl LogSinkConfig {
    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_format(mut self, format: QueryLogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Log sink file name cannot be empty".to_string());
        }
        if self.max_history == 0 {
            return Err("Log sink max history must be greater than 0".to_string());
        }
        Ok(())
    }
}
