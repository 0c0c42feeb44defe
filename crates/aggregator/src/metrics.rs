//! Metrics aggregation for a single unit of work.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use tsd_metrics_domain::{
    Event, Quantity, Samples, Sink, Unit, CLUSTER_KEY, END_KEY, HOST_KEY, ID_KEY, SERVICE_KEY,
    START_KEY,
};

use crate::counter::Counter;
use crate::lifecycle::Lifecycle;
use crate::timer::Timer;

/// Interface for recording timers, counters and gauges.
///
/// Create one instance per unit of work and invoke [`Metrics::close`] when
/// the work completes. After close the instance records nothing further and
/// should be discarded.
pub trait Metrics: Send + Sync {
    /// Create a new counter sample. Every call records a distinct sample,
    /// even for the same name.
    fn create_counter(&self, name: &str) -> Counter;

    /// Increment the current sample of the named counter by 1, creating the
    /// sample if none exists. Use [`Metrics::reset_counter`] to start a new sample.
    fn increment_counter(&self, name: &str) {
        self.increment_counter_by_value(name, 1);
    }

    fn increment_counter_by_value(&self, name: &str, value: i64);

    fn decrement_counter(&self, name: &str) {
        self.increment_counter_by_value(name, -1);
    }

    fn decrement_counter_by_value(&self, name: &str, value: i64) {
        self.increment_counter_by_value(name, value.wrapping_neg());
    }

    /// Start a new zero-valued sample for the named counter; subsequent
    /// increments target it.
    fn reset_counter(&self, name: &str);

    /// Create and start an independent timer sample. Use this for
    /// overlapping measurements under one name.
    fn create_timer(&self, name: &str) -> Timer;

    /// Start the current sample of the named timer.
    fn start_timer(&self, name: &str);

    /// Stop the current sample of the named timer.
    fn stop_timer(&self, name: &str);

    /// Record an externally measured duration.
    fn set_timer(&self, name: &str, value: i64, unit: Unit);

    fn set_gauge_f64(&self, name: &str, value: f64, unit: Option<Unit>);

    fn set_gauge_i64(&self, name: &str, value: i64, unit: Option<Unit>);

    fn add_annotation(&self, key: &str, value: &str);

    fn add_annotations(&self, annotations: &HashMap<String, String>);

    fn is_open(&self) -> bool;

    /// Publish the recorded samples to every sink. Only the first call has
    /// any effect.
    fn close(&self);

    fn open_time(&self) -> DateTime<Utc>;

    /// `None` until closed.
    fn close_time(&self) -> Option<DateTime<Utc>>;
}

/// Labels stamped onto every event at close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLabels {
    pub service: String,
    pub cluster: String,
    pub host: String,
}

#[derive(Debug, Default)]
struct CounterRegistry {
    samples: HashMap<String, Vec<Counter>>,
    current: HashMap<String, Counter>,
}

#[derive(Debug)]
enum TimerSample {
    Live(Timer),
    Fixed(Quantity),
}

#[derive(Debug, Default)]
struct TimerRegistry {
    samples: HashMap<String, Vec<TimerSample>>,
    current: HashMap<String, Timer>,
}

/// [`Metrics`] implementation publishing time series data events.
///
/// Each sample category is guarded by its own lock; counter values and timer
/// state are atomics. The instance makes no attempt to order operations on
/// the same name from different threads: starting and stopping one named
/// timer from two threads is the caller's problem.
pub struct TsdMetrics {
    sinks: Arc<[Arc<dyn Sink>]>,
    labels: Arc<ServiceLabels>,
    lifecycle: Arc<Lifecycle>,
    open_time: DateTime<Utc>,
    close_time: OnceLock<DateTime<Utc>>,
    annotations: Mutex<HashMap<String, String>>,
    timers: Mutex<TimerRegistry>,
    counters: Mutex<CounterRegistry>,
    gauges: Mutex<Samples>,
}

impl TsdMetrics {
    pub fn new(sinks: Arc<[Arc<dyn Sink>]>, labels: Arc<ServiceLabels>) -> Self {
        Self {
            sinks,
            labels,
            lifecycle: Arc::new(Lifecycle::new()),
            open_time: Utc::now(),
            close_time: OnceLock::new(),
            annotations: Mutex::new(HashMap::new()),
            timers: Mutex::new(TimerRegistry::default()),
            counters: Mutex::new(CounterRegistry::default()),
            gauges: Mutex::new(Samples::new()),
        }
    }

    pub fn labels(&self) -> &ServiceLabels {
        &self.labels
    }

    /// Checked while holding the category lock, so a mutation either lands
    /// before the close snapshot or is rejected.
    fn assert_is_open(&self) -> bool {
        let open = self.lifecycle.is_open();
        if !open {
            warn!("Metrics object was closed during an operation; you may have a race condition");
        }
        open
    }

    fn add_gauge(&self, name: &str, quantity: Quantity) {
        let mut gauges = lock(&self.gauges);
        if !self.assert_is_open() {
            return;
        }
        gauges.entry(name.to_string()).or_default().push(quantity);
    }

    fn build_event(&self, close_time: DateTime<Utc>) -> Event {
        let mut annotations = lock(&self.annotations);
        let mut timers = lock(&self.timers);
        let mut counters = lock(&self.counters);
        let mut gauges = lock(&self.gauges);

        let mut annotations = std::mem::take(&mut *annotations);
        annotations.insert(ID_KEY.to_string(), Uuid::new_v4().to_string());
        annotations.insert(HOST_KEY.to_string(), self.labels.host.clone());
        annotations.insert(SERVICE_KEY.to_string(), self.labels.service.clone());
        annotations.insert(CLUSTER_KEY.to_string(), self.labels.cluster.clone());
        annotations.insert(START_KEY.to_string(), format_timestamp(self.open_time));
        annotations.insert(END_KEY.to_string(), format_timestamp(close_time));

        let timer_samples: Samples = std::mem::take(&mut timers.samples)
            .into_iter()
            .filter_map(|(name, samples)| {
                let values: Vec<Quantity> = samples
                    .into_iter()
                    .filter_map(|sample| match sample {
                        TimerSample::Live(timer) if timer.is_aborted() => None,
                        TimerSample::Live(timer) => Some(timer.to_quantity()),
                        TimerSample::Fixed(quantity) => Some(quantity),
                    })
                    .collect();
                (!values.is_empty()).then_some((name, values))
            })
            .collect();
        timers.current.clear();

        let counter_samples: Samples = std::mem::take(&mut counters.samples)
            .into_iter()
            .map(|(name, samples)| (name, samples.iter().map(Counter::to_quantity).collect()))
            .collect();
        counters.current.clear();

        let gauge_samples = std::mem::take(&mut *gauges);

        Event::new(annotations, timer_samples, counter_samples, gauge_samples)
    }
}

impl Metrics for TsdMetrics {
    fn create_counter(&self, name: &str) -> Counter {
        let mut counters = lock(&self.counters);
        if !self.assert_is_open() {
            return Counter::detached(name);
        }
        let counter = Counter::new(name, Arc::clone(&self.lifecycle));
        counters
            .samples
            .entry(name.to_string())
            .or_default()
            .push(counter.clone());
        counter
    }

    fn increment_counter_by_value(&self, name: &str, value: i64) {
        let mut counters = lock(&self.counters);
        if !self.assert_is_open() {
            return;
        }
        let CounterRegistry { samples, current } = &mut *counters;
        let counter = current.entry(name.to_string()).or_insert_with(|| {
            let counter = Counter::new(name, Arc::clone(&self.lifecycle));
            samples
                .entry(name.to_string())
                .or_default()
                .push(counter.clone());
            counter
        });
        counter.add(value);
    }

    fn reset_counter(&self, name: &str) {
        let mut counters = lock(&self.counters);
        if !self.assert_is_open() {
            return;
        }
        let counter = Counter::new(name, Arc::clone(&self.lifecycle));
        counters
            .samples
            .entry(name.to_string())
            .or_default()
            .push(counter.clone());
        counters.current.insert(name.to_string(), counter);
    }

    fn create_timer(&self, name: &str) -> Timer {
        let mut timers = lock(&self.timers);
        if !self.assert_is_open() {
            return Timer::detached(name);
        }
        let timer = Timer::new(name, Arc::clone(&self.lifecycle));
        timers
            .samples
            .entry(name.to_string())
            .or_default()
            .push(TimerSample::Live(timer.clone()));
        timer
    }

    fn start_timer(&self, name: &str) {
        let mut timers = lock(&self.timers);
        if !self.assert_is_open() {
            return;
        }
        if timers.current.get(name).is_some_and(Timer::is_running) {
            // Concurrent samples under one name need create_timer.
            warn!("Cannot start timer because timer already started; timerName={}", name);
            return;
        }
        let timer = Timer::new(name, Arc::clone(&self.lifecycle));
        timers
            .samples
            .entry(name.to_string())
            .or_default()
            .push(TimerSample::Live(timer.clone()));
        timers.current.insert(name.to_string(), timer);
    }

    fn stop_timer(&self, name: &str) {
        let mut timers = lock(&self.timers);
        if !self.assert_is_open() {
            return;
        }
        match timers.current.remove(name) {
            Some(timer) => timer.stop(),
            None => warn!("Cannot stop timer because timer was not started; timerName={}", name),
        }
    }

    fn set_timer(&self, name: &str, value: i64, unit: Unit) {
        let mut timers = lock(&self.timers);
        if !self.assert_is_open() {
            return;
        }
        timers
            .samples
            .entry(name.to_string())
            .or_default()
            .push(TimerSample::Fixed(Quantity::new(value, Some(unit))));
    }

    fn set_gauge_f64(&self, name: &str, value: f64, unit: Option<Unit>) {
        self.add_gauge(name, Quantity::new(value, unit));
    }

    fn set_gauge_i64(&self, name: &str, value: i64, unit: Option<Unit>) {
        self.add_gauge(name, Quantity::new(value, unit));
    }

    fn add_annotation(&self, key: &str, value: &str) {
        let mut annotations = lock(&self.annotations);
        if !self.assert_is_open() {
            return;
        }
        annotations.insert(key.to_string(), value.to_string());
    }

    fn add_annotations(&self, entries: &HashMap<String, String>) {
        let mut annotations = lock(&self.annotations);
        if !self.assert_is_open() {
            return;
        }
        annotations.extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    fn is_open(&self) -> bool {
        self.lifecycle.is_open()
    }

    fn close(&self) {
        if !self.lifecycle.close() {
            warn!("Metrics object was already closed");
            return;
        }

        let close_time = Utc::now().max(self.open_time);
        let _ = self.close_time.set(close_time);

        let event = Arc::new(self.build_event(close_time));
        debug!(
            id = event.annotation(ID_KEY).unwrap_or_default(),
            sinks = self.sinks.len(),
            "Publishing metrics event"
        );

        for sink in self.sinks.iter() {
            sink.record(Arc::clone(&event));
        }
    }

    fn open_time(&self) -> DateTime<Utc> {
        self.open_time
    }

    fn close_time(&self) -> Option<DateTime<Utc>> {
        self.close_time.get().copied()
    }
}

/// Poisoning is ignored; every critical section leaves the data consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
