use std::sync::Arc;

use tracing::error;

use tsd_metrics_core::{LogSinkConfig, MetricsError, MetricsResult, QueryLogFormat};
use tsd_metrics_domain::{Event, Sink};

use super::query_log::{QueryLogBody, StenoEnvelope};
use crate::log_rotation::{LogRotationConfig, RollingFileWriter};

/// Sink which appends one JSON query log line per event to a rolling file.
pub struct TsdLogSink {
    format: QueryLogFormat,
    writer: RollingFileWriter,
}

impl TsdLogSink {
    pub fn new(config: &LogSinkConfig) -> MetricsResult<Self> {
        config.validate().map_err(MetricsError::Configuration)?;

        Ok(Self {
            format: config.format,
            writer: RollingFileWriter::new(LogRotationConfig::from(config))?,
        })
    }

    pub fn format(&self) -> QueryLogFormat {
        self.format
    }

    pub fn render(&self, event: &Event) -> MetricsResult<String> {
        let line = match self.format {
            QueryLogFormat::Tsd => serde_json::to_string(&QueryLogBody::from_event(event))?,
            QueryLogFormat::Steno => serde_json::to_string(&StenoEnvelope::from_event(event))?,
        };
        Ok(line)
    }

    fn try_record(&self, event: &Event) -> MetricsResult<()> {
        let line = self.render(event)?;
        self.writer.write_line(&line)
    }
}

impl Sink for TsdLogSink {
    fn record(&self, event: Arc<Event>) {
        if let Err(e) = self.try_record(&event) {
            error!(
                path = ?self.writer.config().active_path(),
                "Failed to record metrics event: {}", e
            );
        }
    }
}
