use std::sync::Arc;

use tracing::warn;

use tsd_metrics_domain::{Event, Sink};

/// Sink used when the factory could not be configured; it records nothing
/// and reports why on every event.
#[derive(Debug, Clone)]
pub struct WarningSink {
    reasons: Vec<String>,
}

impl WarningSink {
    pub fn new(reasons: Vec<String>) -> Self {
        Self { reasons }
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

impl Sink for WarningSink {
    fn record(&self, _event: Arc<Event>) {
        warn!(reasons = ?self.reasons, "Unable to record event, metrics disabled");
    }
}
