use std::sync::Arc;

use crate::events::Event;

/// Destination for finished events.
///
/// `record` is called synchronously from the closing thread, once per
/// event. The aggregator does not inspect the outcome: a sink handles and
/// reports its own failures.
pub trait Sink: Send + Sync {
    fn record(&self, event: Arc<Event>);
}
