//! Counters describing how deprecations were handled.

use crate::application::dispatcher::Disposition;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared handling counters.
///
/// Clones share the same counters, so a handle obtained from the workflow
/// keeps observing it.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Deprecations swallowed by a `silence` rule
    silenced: AtomicU64,
    /// Deprecations written to the sink by a `log` rule
    logged: AtomicU64,
    /// Deprecations failed by a `throw` rule
    thrown: AtomicU64,
    /// Deprecations no rule matched
    unhandled: AtomicU64,
    /// Unmatched deprecations that were raised as errors
    raised: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    /// Count a completed dispatch.
    pub(crate) fn record(&self, disposition: Disposition) {
        let counter = match disposition {
            Disposition::Silenced => &self.inner.silenced,
            Disposition::Logged => &self.inner.logged,
            Disposition::Unhandled => &self.inner.unhandled,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_thrown(&self) {
        self.inner.thrown.fetch_add(1, Ordering::Relaxed);
    }

    /// Unmatched and raised: counts toward both `unhandled` and `raised`.
    pub(crate) fn record_raised(&self) {
        self.inner.unhandled.fetch_add(1, Ordering::Relaxed);
        self.inner.raised.fetch_add(1, Ordering::Relaxed);
    }

    pub fn events_silenced(&self) -> u64 {
        self.inner.silenced.load(Ordering::Relaxed)
    }

    pub fn events_logged(&self) -> u64 {
        self.inner.logged.load(Ordering::Relaxed)
    }

    pub fn events_thrown(&self) -> u64 {
        self.inner.thrown.load(Ordering::Relaxed)
    }

    pub fn events_unhandled(&self) -> u64 {
        self.inner.unhandled.load(Ordering::Relaxed)
    }

    pub fn events_raised(&self) -> u64 {
        self.inner.raised.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_silenced: self.events_silenced(),
            events_logged: self.events_logged(),
            events_thrown: self.events_thrown(),
            events_unhandled: self.events_unhandled(),
            events_raised: self.events_raised(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.inner.silenced.store(0, Ordering::Relaxed);
        self.inner.logged.store(0, Ordering::Relaxed);
        self.inner.thrown.store(0, Ordering::Relaxed);
        self.inner.unhandled.store(0, Ordering::Relaxed);
        self.inner.raised.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub events_silenced: u64,
    pub events_logged: u64,
    pub events_thrown: u64,
    /// Includes the raised ones
    pub events_unhandled: u64,
    pub events_raised: u64,
}

impl MetricsSnapshot {
    /// Total deprecations dispatched.
    pub fn total(&self) -> u64 {
        self.events_silenced
            .saturating_add(self.events_logged)
            .saturating_add(self.events_thrown)
            .saturating_add(self.events_unhandled)
    }

    /// Share of deprecations that some rule matched (0.0 to 1.0).
    ///
    /// Returns 0.0 if nothing has been dispatched.
    pub fn handled_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (total - self.events_unhandled) as f64 / total as f64
        }
    }
}
