//! One-shot completion flag shared by a search run.

use std::sync::atomic::{AtomicBool, Ordering};

/// Single-assignment "done" flag.
///
/// Workers poll [`is_done`](Self::is_done) once per iteration. The first
/// worker to [`claim`](Self::claim) it owns the run's result; every later
/// claim fails and the caller discards its own result.
#[derive(Debug, Default)]
pub struct MatchSignal {
    done: AtomicBool,
}

impl MatchSignal {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking check used on the hot path.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Returns `true` for exactly one caller over the lifetime of the flag.
    #[inline]
    pub fn claim(&self) -> bool {
        self.done
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Marks the run as finished without a result.
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Release);
    }
}
