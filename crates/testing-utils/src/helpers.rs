//! Assertions over recorded events.

use chrono::{DateTime, FixedOffset};
use tsd_metrics_domain::{Event, Quantity, END_KEY, RESERVED_ANNOTATION_KEYS, START_KEY};

/// Integer values of the named samples, in recording order. Empty when the
/// name is absent.
pub fn integer_values(samples: Option<&Vec<Quantity>>) -> Vec<i64> {
    samples
        .map(|values| values.iter().filter_map(|q| q.value().as_i64()).collect())
        .unwrap_or_default()
}

pub fn counter_values(event: &Event, name: &str) -> Vec<i64> {
    integer_values(event.counter_samples().get(name))
}

pub fn timer_values(event: &Event, name: &str) -> Vec<i64> {
    integer_values(event.timer_samples().get(name))
}

pub fn gauge_values(event: &Event, name: &str) -> Vec<f64> {
    event
        .gauge_samples()
        .get(name)
        .map(|values| values.iter().map(|q| q.value().as_f64()).collect())
        .unwrap_or_default()
}

pub fn parse_timestamp(event: &Event, key: &str) -> DateTime<FixedOffset> {
    let raw = event
        .annotation(key)
        .unwrap_or_else(|| panic!("missing annotation {key}"));
    DateTime::parse_from_rfc3339(raw).unwrap_or_else(|e| panic!("bad timestamp {raw}: {e}"))
}

/// Panics unless every reserved annotation is present and start <= end.
pub fn assert_reserved_annotations(event: &Event) {
    for key in RESERVED_ANNOTATION_KEYS {
        assert!(
            event.annotation(key).is_some_and(|v| !v.is_empty()),
            "missing reserved annotation {key}"
        );
    }
    assert!(parse_timestamp(event, START_KEY) <= parse_timestamp(event, END_KEY));
}
