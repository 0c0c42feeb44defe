//! Factory producing [`TsdMetrics`] instances bound to shared sinks and labels.

use std::sync::Arc;

use tracing::{error, info};

use tsd_metrics_core::{AppConfig, LogSinkConfig, MetricsConfig};
use tsd_metrics_domain::Sink;
use tsd_metrics_infrastructure::{TsdLogSink, WarningSink};

use crate::metrics::{ServiceLabels, TsdMetrics};

const SERVICE_PLACEHOLDER: &str = "<SERVICE_NAME>";
const CLUSTER_PLACEHOLDER: &str = "<CLUSTER_NAME>";
const HOST_PLACEHOLDER: &str = "<HOST_NAME>";

pub trait MetricsFactory: Send + Sync {
    type Metrics;

    /// Return a freshly opened metrics instance.
    fn create(&self) -> Self::Metrics;
}

/// Construction options for [`TsdMetricsFactory`].
///
/// `host` and `sinks` are optional; unset values are defaulted before the
/// options are validated.
#[derive(Clone, Default)]
pub struct FactoryOptions {
    pub service: String,
    pub cluster: String,
    pub host: Option<String>,
    pub sinks: Option<Vec<Arc<dyn Sink>>>,
    /// Used only when `sinks` is unset.
    pub sink_config: LogSinkConfig,
}

impl FactoryOptions {
    pub fn new(service: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            cluster: cluster.into(),
            ..Self::default()
        }
    }

    pub fn from_config(config: &MetricsConfig) -> Self {
        Self {
            service: config.service.clone(),
            cluster: config.cluster.clone(),
            host: config.host.clone(),
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_sinks(mut self, sinks: Vec<Arc<dyn Sink>>) -> Self {
        self.sinks = Some(sinks);
        self
    }

    pub fn with_sink_config(mut self, sink_config: LogSinkConfig) -> Self {
        self.sink_config = sink_config;
        self
    }
}

/// Creates [`TsdMetrics`] instances.
///
/// Invalid options never fail construction. Every failure is collected, logged
/// at error, and the configured sinks are replaced by a single
/// [`WarningSink`] so that each closed instance repeats the reasons instead
/// of recording data.
pub struct TsdMetricsFactory {
    sinks: Arc<[Arc<dyn Sink>]>,
    labels: Arc<ServiceLabels>,
    failures: Vec<String>,
}

impl TsdMetricsFactory {
    pub fn new(options: FactoryOptions) -> Self {
        let mut failures = Vec::new();

        let host = options.host.or_else(local_hostname).unwrap_or_default();

        let sinks = match options.sinks {
            Some(sinks) => sinks,
            None => match TsdLogSink::new(&options.sink_config) {
                Ok(sink) => vec![Arc::new(sink) as Arc<dyn Sink>],
                Err(e) => {
                    failures.push(format!("Unable to create default sink: {e}"));
                    Vec::new()
                }
            },
        };

        let service = required(options.service, "Service", SERVICE_PLACEHOLDER, &mut failures);
        let cluster = required(options.cluster, "Cluster", CLUSTER_PLACEHOLDER, &mut failures);
        let host = required(host, "Host", HOST_PLACEHOLDER, &mut failures);

        let sinks: Arc<[Arc<dyn Sink>]> = if failures.is_empty() {
            info!(
                service = %service,
                cluster = %cluster,
                host = %host,
                sinks = sinks.len(),
                "Metrics factory created"
            );
            Arc::from(sinks)
        } else {
            error!(reasons = ?failures, "Invalid metrics factory options; metrics disabled");
            Arc::from(vec![
                Arc::new(WarningSink::new(failures.clone())) as Arc<dyn Sink>
            ])
        };

        Self {
            sinks,
            labels: Arc::new(ServiceLabels {
                service,
                cluster,
                host,
            }),
            failures,
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(FactoryOptions::from_config(&config.metrics).with_sink_config(config.sink.clone()))
    }

    pub fn labels(&self) -> &ServiceLabels {
        &self.labels
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// True when construction fell back to the warning sink.
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl MetricsFactory for TsdMetricsFactory {
    type Metrics = TsdMetrics;

    fn create(&self) -> TsdMetrics {
        TsdMetrics::new(Arc::clone(&self.sinks), Arc::clone(&self.labels))
    }
}

fn required(value: String, label: &str, placeholder: &str, failures: &mut Vec<String>) -> String {
    if value.trim().is_empty() {
        failures.push(format!("{label} cannot be empty"));
        placeholder.to_string()
    } else {
        value
    }
}

fn local_hostname() -> Option<String> {
    match hostname::get() {
        Ok(name) => Some(name.to_string_lossy().into_owned()),
        Err(e) => {
            error!("Unable to determine local hostname: {}", e);
            None
        }
    }
}
