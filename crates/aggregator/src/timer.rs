use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::warn;

use tsd_metrics_domain::{units::NANOSECOND, Quantity};

use crate::lifecycle::Lifecycle;

// Elapsed nanoseconds once stopped; negative sentinels otherwise.
const RUNNING: i64 = -1;
const ABORTED: i64 = -2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    Stopped,
    Aborted,
}

/// One timer sample, started on creation.
///
/// State and elapsed time live in a single atomic so that concurrent
/// `stop`/`abort` calls resolve to exactly one terminal state.
#[derive(Debug, Clone)]
pub struct Timer {
    inner: Arc<TimerInner>,
}

#[derive(Debug)]
struct TimerInner {
    name: String,
    start: Instant,
    elapsed: AtomicI64,
    lifecycle: Arc<Lifecycle>,
}

impl Timer {
    pub(crate) fn new(name: &str, lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            inner: Arc::new(TimerInner {
                name: name.to_string(),
                start: Instant::now(),
                elapsed: AtomicI64::new(RUNNING),
                lifecycle,
            }),
        }
    }

    pub(crate) fn detached(name: &str) -> Self {
        Self::new(name, Arc::new(Lifecycle::detached()))
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn stop(&self) {
        if !self.inner.lifecycle.is_open() {
            warn!(
                "Timer stopped after metrics instance closed; timer={}",
                self.inner.name
            );
        }

        let elapsed = i64::try_from(self.inner.start.elapsed().as_nanos()).unwrap_or(i64::MAX);
        match self.inner.elapsed.compare_exchange(
            RUNNING,
            elapsed,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {}
            Err(ABORTED) => warn!("Timer stopped after aborted; timer={}", self.inner.name),
            Err(_) => warn!("Timer stopped multiple times; timer={}", self.inner.name),
        }
    }

    /// Discards the sample; an aborted timer is left out of the event.
    pub fn abort(&self) {
        if !self.inner.lifecycle.is_open() {
            warn!(
                "Timer aborted after metrics instance closed; timer={}",
                self.inner.name
            );
        }

        match self.inner.elapsed.compare_exchange(
            RUNNING,
            ABORTED,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {}
            Err(ABORTED) => warn!("Timer aborted multiple times; timer={}", self.inner.name),
            Err(_) => warn!("Timer aborted after stopped; timer={}", self.inner.name),
        }
    }

    pub fn state(&self) -> TimerState {
        match self.inner.elapsed.load(Ordering::Acquire) {
            RUNNING => TimerState::Running,
            ABORTED => TimerState::Aborted,
            _ => TimerState::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    pub fn is_aborted(&self) -> bool {
        self.state() == TimerState::Aborted
    }

    /// Elapsed nanoseconds. Zero unless stopped; reading a running timer
    /// is reported as misuse.
    pub fn value(&self) -> i64 {
        match self.inner.elapsed.load(Ordering::Acquire) {
            RUNNING => {
                warn!("Timer access before it is stopped; timer={}", self.inner.name);
                0
            }
            ABORTED => 0,
            elapsed => elapsed,
        }
    }

    pub fn to_quantity(&self) -> Quantity {
        Quantity::new(self.value(), Some(NANOSECOND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tsd_metrics_domain::QuantityValue;

    fn open_timer(name: &str) -> (Timer, Arc<Lifecycle>) {
        let lifecycle = Arc::new(Lifecycle::new());
        (Timer::new(name, Arc::clone(&lifecycle)), lifecycle)
    }

    #[test]
    fn test_timer_starts_running() {
        let (timer, _) = open_timer("db");
        assert!(timer.is_running());
        assert!(!timer.is_aborted());
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn test_value_before_stop_is_zero() {
        let (timer, _) = open_timer("db");
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(timer.value(), 0);
    }

    #[test]
    fn test_stop_records_elapsed() {
        let (timer, _) = open_timer("db");
        std::thread::sleep(Duration::from_millis(5));
        timer.stop();

        assert_eq!(timer.state(), TimerState::Stopped);
        assert!(timer.value() >= 5_000_000);

        let quantity = timer.to_quantity();
        assert_eq!(quantity.unit_name().as_deref(), Some("nanosecond"));
        assert!(matches!(quantity.value(), QuantityValue::Integer(v) if v >= 5_000_000));
    }

    #[test]
    fn test_second_stop_keeps_first_value() {
        let (timer, _) = open_timer("db");
        timer.stop();
        let first = timer.value();
        std::thread::sleep(Duration::from_millis(5));
        timer.stop();
        assert_eq!(timer.value(), first);
    }

    #[test]
    fn test_abort_is_terminal() {
        let (timer, _) = open_timer("db");
        timer.abort();
        assert!(timer.is_aborted());
        assert!(!timer.is_running());

        timer.stop();
        timer.abort();
        assert_eq!(timer.state(), TimerState::Aborted);
        assert_eq!(timer.value(), 0);
    }

    #[test]
    fn test_abort_after_stop_keeps_stopped() {
        let (timer, _) = open_timer("db");
        timer.stop();
        let elapsed = timer.value();
        timer.abort();
        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.value(), elapsed);
    }

    #[test]
    fn test_concurrent_stop_and_abort_resolve_once() {
        let (timer, _) = open_timer("db");
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let timer = timer.clone();
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        timer.stop();
                    } else {
                        timer.abort();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_ne!(timer.state(), TimerState::Running);
    }

    #[test]
    fn test_stop_after_close_still_terminates() {
        let (timer, lifecycle) = open_timer("db");
        assert!(lifecycle.close());
        timer.stop();
        assert_eq!(timer.state(), TimerState::Stopped);
    }

    #[test]
    fn test_detached_timer() {
        let timer = Timer::detached("db");
        assert!(timer.is_running());
        timer.stop();
        assert!(!timer.is_running());
    }
}
