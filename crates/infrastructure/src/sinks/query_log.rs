//! Query log line layout.
//!
//! ```text
//! {"version":"2f","annotations":{..},"counters":{"hits":{"values":[{"value":3}]}},"timers":{..},"gauges":{..}}
//! ```

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use tsd_metrics_domain::{Event, Quantity, Samples, HOST_KEY};

pub const QUERY_LOG_VERSION: &str = "2f";
pub const STENO_EVENT_NAME: &str = "aint.metrics";

#[derive(Debug, Serialize)]
pub struct QueryLogBody<'a> {
    version: &'static str,
    annotations: BTreeMap<&'a str, &'a str>,
    counters: BTreeMap<&'a str, SampleValues<'a>>,
    timers: BTreeMap<&'a str, SampleValues<'a>>,
    gauges: BTreeMap<&'a str, SampleValues<'a>>,
}

#[derive(Debug, Serialize)]
struct SampleValues<'a> {
    values: &'a [Quantity],
}

impl<'a> QueryLogBody<'a> {
    pub fn from_event(event: &'a Event) -> Self {
        Self {
            version: QUERY_LOG_VERSION,
            annotations: event
                .annotations()
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            counters: sample_values(event.counter_samples()),
            timers: sample_values(event.timer_samples()),
            gauges: sample_values(event.gauge_samples()),
        }
    }
}

fn sample_values(samples: &Samples) -> BTreeMap<&str, SampleValues<'_>> {
    samples
        .iter()
        .map(|(name, values)| (name.as_str(), SampleValues { values }))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct StenoEnvelope<'a> {
    time: String,
    name: &'static str,
    level: &'static str,
    data: QueryLogBody<'a>,
    id: String,
    context: StenoContext<'a>,
}

#[derive(Debug, Serialize)]
struct StenoContext<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<&'a str>,
}

impl<'a> StenoEnvelope<'a> {
    pub fn from_event(event: &'a Event) -> Self {
        Self {
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            name: STENO_EVENT_NAME,
            level: "info",
            data: QueryLogBody::from_event(event),
            id: Uuid::new_v4().to_string(),
            context: StenoContext {
                host: event.annotation(HOST_KEY),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tsd_metrics_domain::units::MILLISECOND;

    fn sample_event() -> Event {
        let mut annotations = HashMap::new();
        annotations.insert("_host".to_string(), "app01".to_string());
        let mut counters = Samples::new();
        counters.insert(
            "hits".to_string(),
            vec![Quantity::integer(3), Quantity::integer(0)],
        );
        let mut timers = Samples::new();
        timers.insert(
            "latency".to_string(),
            vec![Quantity::new(12i64, Some(MILLISECOND))],
        );
        Event::new(annotations, timers, counters, Samples::new())
    }

    #[test]
    fn test_body_layout() {
        let event = sample_event();
        let json = serde_json::to_value(QueryLogBody::from_event(&event)).unwrap();

        assert_eq!(json["version"], "2f");
        assert_eq!(json["annotations"]["_host"], "app01");
        assert_eq!(json["counters"]["hits"]["values"][0]["value"], 3);
        assert_eq!(json["counters"]["hits"]["values"][1]["value"], 0);
        assert_eq!(json["timers"]["latency"]["values"][0]["unit"], "millisecond");
        assert!(json["gauges"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_steno_envelope() {
        let event = sample_event();
        let json = serde_json::to_value(StenoEnvelope::from_event(&event)).unwrap();

        assert_eq!(json["name"], "aint.metrics");
        assert_eq!(json["level"], "info");
        assert_eq!(json["data"]["version"], "2f");
        assert_eq!(json["context"]["host"], "app01");
        assert!(Uuid::parse_str(json["id"].as_str().unwrap()).is_ok());
    }
}
