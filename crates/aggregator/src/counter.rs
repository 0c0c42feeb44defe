use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tracing::warn;

use tsd_metrics_domain::Quantity;

use crate::lifecycle::Lifecycle;

/// One counter sample. Starts at zero; clones share the same value.
///
/// Modifications after the owning metrics instance closes are ignored.
#[derive(Debug, Clone)]
pub struct Counter {
    inner: Arc<CounterInner>,
}

#[derive(Debug)]
struct CounterInner {
    name: String,
    value: AtomicI64,
    lifecycle: Arc<Lifecycle>,
}

impl Counter {
    pub(crate) fn new(name: &str, lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            inner: Arc::new(CounterInner {
                name: name.to_string(),
                value: AtomicI64::new(0),
                lifecycle,
            }),
        }
    }

    /// A counter that belongs to no open instance and is never recorded.
    pub(crate) fn detached(name: &str) -> Self {
        Self::new(name, Arc::new(Lifecycle::detached()))
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn increment(&self) {
        self.increment_by_value(1);
    }

    pub fn decrement(&self) {
        self.increment_by_value(-1);
    }

    pub fn increment_by_value(&self, delta: i64) {
        if !self.inner.lifecycle.is_open() {
            warn!(
                "Counter manipulated after metrics instance closed; counter={}",
                self.inner.name
            );
            return;
        }
        self.add(delta);
    }

    pub fn decrement_by_value(&self, delta: i64) {
        self.increment_by_value(delta.wrapping_neg());
    }

    pub fn value(&self) -> i64 {
        self.inner.value.load(Ordering::Acquire)
    }

    pub fn to_quantity(&self) -> Quantity {
        Quantity::integer(self.value())
    }

    /// Applies `delta` without the lifecycle check; the aggregator calls
    /// this while holding the counter lock.
    pub(crate) fn add(&self, delta: i64) {
        self.inner.value.fetch_add(delta, Ordering::AcqRel);
    }
}
