use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;

use mockall::Sequence;
use tsd_metrics_aggregator::{FactoryOptions, Metrics, MetricsFactory, TsdMetricsFactory};
use tsd_metrics_core::LogSinkConfig;
use tsd_metrics_domain::units::{BYTE, SECOND};
use tsd_metrics_domain::{Event, Sink, Unit, HOST_KEY, SERVICE_KEY};
use tsd_metrics_testing_utils::{
    assert_reserved_annotations, counter_values, gauge_values, timer_values, MockSink,
    RecordingSink,
};

fn factory_with(sinks: Vec<Arc<dyn Sink>>) -> TsdMetricsFactory {
    TsdMetricsFactory::new(
        FactoryOptions::new("checkout", "checkout-test")
            .with_host("test-host")
            .with_sinks(sinks),
    )
}

#[test]
fn test_full_unit_of_work() {
    let sink = RecordingSink::shared();
    let factory = factory_with(vec![sink.clone()]);
    let metrics = factory.create();

    metrics.add_annotation("route", "/cart");
    metrics.start_timer("request");
    metrics.increment_counter("items");
    metrics.increment_counter("items");
    metrics.set_gauge_i64("payload", 512, Some(BYTE));
    metrics.set_gauge_f64("ratio", 0.25, None);
    metrics.set_timer("upstream", 3, SECOND);
    metrics.stop_timer("request");
    metrics.close();

    let event = sink.single();
    assert_reserved_annotations(&event);
    assert_eq!(event.annotation("route"), Some("/cart"));
    assert_eq!(event.annotation(SERVICE_KEY), Some("checkout"));
    assert_eq!(event.annotation(HOST_KEY), Some("test-host"));
    assert_eq!(counter_values(&event, "items"), vec![2]);
    assert_eq!(timer_values(&event, "upstream"), vec![3]);
    assert_eq!(timer_values(&event, "request").len(), 1);
    assert_eq!(gauge_values(&event, "ratio"), vec![0.25]);
    assert_eq!(gauge_values(&event, "payload"), vec![512.0]);
}

#[test]
fn test_concurrent_increments_are_not_lost() {
    let sink = RecordingSink::shared();
    let metrics = Arc::new(factory_with(vec![sink.clone()]).create());
    let counter = metrics.create_counter("handle");

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let metrics = Arc::clone(&metrics);
            let counter = counter.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    metrics.increment_counter("shared");
                    counter.increment();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    metrics.close();

    let event = sink.single();
    assert_eq!(counter_values(&event, "shared"), vec![8000]);
    assert_eq!(counter_values(&event, "handle"), vec![8000]);
}

#[test]
fn test_concurrent_mixed_deltas_are_not_lost() {
    let sink = RecordingSink::shared();
    let metrics = Arc::new(factory_with(vec![sink.clone()]).create());

    // Per round: +1 +5 -1 -2 = +3
    let workers: Vec<_> = (0..8)
        .map(|_| {
            let metrics = Arc::clone(&metrics);
            thread::spawn(move || {
                for _ in 0..500 {
                    metrics.increment_counter("balance");
                    metrics.increment_counter_by_value("balance", 5);
                    metrics.decrement_counter("balance");
                    metrics.decrement_counter_by_value("balance", 2);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    metrics.close();

    let event = sink.single();
    assert_eq!(counter_values(&event, "balance"), vec![8 * 500 * 3]);
}

#[test]
fn test_concurrent_samples_under_one_name() {
    let sink = RecordingSink::shared();
    let metrics = Arc::new(factory_with(vec![sink.clone()]).create());

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let metrics = Arc::clone(&metrics);
            thread::spawn(move || {
                let timer = metrics.create_timer("fanout");
                metrics.set_gauge_i64("depth", 1, None);
                timer.stop();
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    metrics.close();

    let event = sink.single();
    assert_eq!(timer_values(&event, "fanout").len(), 4);
    assert_eq!(gauge_values(&event, "depth").len(), 4);
}

#[test]
fn test_concurrent_close_publishes_once() {
    let sink = RecordingSink::shared();
    let metrics = Arc::new(factory_with(vec![sink.clone()]).create());

    let closers: Vec<_> = (0..8)
        .map(|_| {
            let metrics = Arc::clone(&metrics);
            thread::spawn(move || metrics.close())
        })
        .collect();
    for closer in closers {
        closer.join().unwrap();
    }

    assert_eq!(sink.len(), 1);
    assert!(!metrics.is_open());
}

#[test]
fn test_sinks_called_in_order_with_same_event() {
    let seen: Arc<Mutex<Vec<Arc<Event>>>> = Arc::new(Mutex::new(Vec::new()));
    let mut sequence = Sequence::new();

    let mut first = MockSink::new();
    let captured = Arc::clone(&seen);
    first
        .expect_record()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(move |event| captured.lock().unwrap().push(event));

    let mut second = MockSink::new();
    let captured = Arc::clone(&seen);
    second
        .expect_record()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(move |event| captured.lock().unwrap().push(event));

    let factory = factory_with(vec![Arc::new(first), Arc::new(second)]);
    factory.create().close();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(Arc::ptr_eq(&seen[0], &seen[1]));
}

#[test]
fn test_recording_sinks_observe_order() {
    let first = RecordingSink::shared();
    let second = RecordingSink::shared();
    let factory = factory_with(vec![first.clone(), second.clone()]);
    factory.create().close();

    let a = first.recorded().remove(0);
    let b = second.recorded().remove(0);
    assert!(a.arrival < b.arrival);
    assert!(Arc::ptr_eq(&a.event, &b.event));
}

#[test]
fn test_instances_share_sinks_independently() {
    let sink = RecordingSink::shared();
    let factory = factory_with(vec![sink.clone()]);

    let first = factory.create();
    let second = factory.create();
    first.increment_counter("requests");
    second.increment_counter_by_value("requests", 5);
    second.close();
    first.close();

    let values: Vec<Vec<i64>> = sink
        .events()
        .iter()
        .map(|event| counter_values(event, "requests"))
        .collect();
    assert_eq!(values, vec![vec![5], vec![1]]);
}

#[test]
fn test_degraded_factory_records_nothing() {
    let sink = RecordingSink::shared();
    let factory = TsdMetricsFactory::new(
        FactoryOptions::new("", "checkout-test")
            .with_host("test-host")
            .with_sinks(vec![sink.clone()]),
    );

    let metrics = factory.create();
    metrics.increment_counter("requests");
    metrics.close();

    assert!(factory.is_degraded());
    assert!(sink.is_empty());
}

#[test]
fn test_compound_unit_gauge() {
    let sink = RecordingSink::shared();
    let metrics = factory_with(vec![sink.clone()]).create();
    let rate = Unit::per(BYTE, SECOND);

    metrics.set_gauge_f64("throughput", 128.0, rate);
    metrics.add_annotations(&HashMap::from([("kind".to_string(), "upload".to_string())]));
    metrics.close();

    let event = sink.single();
    let sample = &event.gauge_samples()["throughput"][0];
    assert_eq!(sample.unit_name().as_deref(), Some("byte/second"));
    assert_eq!(event.annotation("kind"), Some("upload"));
}

#[test]
fn test_default_sink_writes_query_log() {
    let dir = tempfile::TempDir::new().unwrap();
    let factory = TsdMetricsFactory::new(
        FactoryOptions::new("checkout", "checkout-test")
            .with_host("test-host")
            .with_sink_config(
                LogSinkConfig::default()
                    .with_directory(dir.path().to_string_lossy())
                    .with_name("metrics"),
            ),
    );
    assert!(!factory.is_degraded());

    let metrics = factory.create();
    metrics.increment_counter("requests");
    metrics.close();

    let content = std::fs::read_to_string(dir.path().join("metrics.log")).unwrap();
    let line: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
    assert_eq!(line["annotations"]["_cluster"], "checkout-test");
    assert_eq!(line["counters"]["requests"]["values"][0]["value"], 1);
}
