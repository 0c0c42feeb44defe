//! Per-unit-of-work metrics aggregation.
//!
//! A [`TsdMetricsFactory`] hands out [`TsdMetrics`] instances. Each instance
//! accumulates counters, timers, gauges and annotations for one unit of work
//! and, when closed, publishes a single immutable event to every sink.
//!
//! ```no_run
//! use tsd_metrics_aggregator::{FactoryOptions, Metrics, MetricsFactory, TsdMetricsFactory};
//!
//! let factory = TsdMetricsFactory::new(FactoryOptions::new("checkout", "checkout-prod"));
//! let metrics = factory.create();
//! metrics.start_timer("request");
//! metrics.increment_counter("items");
//! metrics.stop_timer("request");
//! metrics.close();
//! ```

mod counter;
mod factory;
mod lifecycle;
mod metrics;
mod timer;

pub use counter::Counter;
pub use factory::{FactoryOptions, MetricsFactory, TsdMetricsFactory};
pub use metrics::{Metrics, ServiceLabels, TsdMetrics};
pub use timer::{Timer, TimerState};
