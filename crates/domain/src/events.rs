//! 事件
//!
//! The immutable snapshot of one unit of work, handed to every sink at close.

use std::collections::HashMap;

use serde::Serialize;

use crate::quantity::Quantity;

/// Samples recorded under each metric name, in insertion order.
pub type Samples = HashMap<String, Vec<Quantity>>;

pub const ID_KEY: &str = "_id";
pub const HOST_KEY: &str = "_host";
pub const SERVICE_KEY: &str = "_service";
pub const CLUSTER_KEY: &str = "_cluster";
pub const START_KEY: &str = "_start";
pub const END_KEY: &str = "_end";

/// Annotation keys injected at close; caller-set values are overwritten.
pub const RESERVED_ANNOTATION_KEYS: [&str; 6] =
    [ID_KEY, HOST_KEY, SERVICE_KEY, CLUSTER_KEY, START_KEY, END_KEY];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Event {
    annotations: HashMap<String, String>,
    timer_samples: Samples,
    counter_samples: Samples,
    gauge_samples: Samples,
}

impl Event {
    pub fn new(
        annotations: HashMap<String, String>,
        timer_samples: Samples,
        counter_samples: Samples,
        gauge_samples: Samples,
    ) -> Self {
        Self {
            annotations,
            timer_samples,
            counter_samples,
            gauge_samples,
        }
    }

    pub fn annotations(&self) -> &HashMap<String, String> {
        &self.annotations
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    pub fn timer_samples(&self) -> &Samples {
        &self.timer_samples
    }

    pub fn counter_samples(&self) -> &Samples {
        &self.counter_samples
    }

    pub fn gauge_samples(&self) -> &Samples {
        &self.gauge_samples
    }

    pub fn is_reserved_key(key: &str) -> bool {
        RESERVED_ANNOTATION_KEYS.contains(&key)
    }
}
