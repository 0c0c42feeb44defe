use std::sync::atomic::{AtomicBool, Ordering};

/// Open/closed flag shared by a metrics instance and every handle it issues.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    open: AtomicBool,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self {
            open: AtomicBool::new(true),
        }
    }

    /// Lifecycle for handles issued after close; never open.
    pub(crate) fn detached() -> Self {
        Self {
            open: AtomicBool::new(false),
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Returns `true` only for the caller that performed the transition.
    pub(crate) fn close(&self) -> bool {
        self.open
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
