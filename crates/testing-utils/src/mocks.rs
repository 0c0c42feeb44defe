//! Sink test doubles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use mockall::mock;
use tsd_metrics_domain::{Event, Sink};

static ARRIVAL: AtomicU64 = AtomicU64::new(0);

/// An event as seen by a [`RecordingSink`].
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub event: Arc<Event>,
    /// Position in the process-wide arrival order across all recording sinks.
    pub arrival: u64,
}

/// Sink that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn events(&self) -> Vec<Arc<Event>> {
        self.recorded().into_iter().map(|r| r.event).collect()
    }

    pub fn recorded(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The single recorded event; panics if there is not exactly one.
    pub fn single(&self) -> Arc<Event> {
        let events = self.events();
        assert_eq!(events.len(), 1, "expected exactly one recorded event");
        Arc::clone(&events[0])
    }
}

impl Sink for RecordingSink {
    fn record(&self, event: Arc<Event>) {
        let arrival = ARRIVAL.fetch_add(1, Ordering::SeqCst);
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedEvent { event, arrival });
    }
}

mock! {
    pub Sink {}

    impl Sink for Sink {
        fn record(&self, event: Arc<Event>);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_arrival_order() {
        let first = RecordingSink::new();
        let second = RecordingSink::new();
        let event = Arc::new(Event::default());

        first.record(Arc::clone(&event));
        second.record(Arc::clone(&event));

        let a = first.recorded().remove(0);
        let b = second.recorded().remove(0);
        assert!(a.arrival < b.arrival);
        assert!(Arc::ptr_eq(&a.event, &b.event));
    }

    #[test]
    fn test_mock_sink_expectation() {
        let mut sink = MockSink::new();
        sink.expect_record().times(1).return_const(());
        sink.record(Arc::new(Event::default()));
    }
}
