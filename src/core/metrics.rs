//! Dispatch metrics for observability
//!
//! Counters for how many entries were dispatched, how many were filtered out
//! before reaching any writer, and how many writer calls failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use channel_logger::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.dispatched_count(), 1);
/// assert_eq!(metrics.filtered_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Entries handed to the writers
    dispatched: AtomicU64,

    /// Calls rejected by level, mute or enable filtering
    filtered: AtomicU64,

    /// Individual writer calls that returned an error or panicked
    writer_failures: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            writer_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writer_failure_count(&self) -> u64 {
        self.writer_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_writer_failure(&self) -> u64 {
        self.writer_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of log calls that were filtered, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been logged yet.
    pub fn filter_rate(&self) -> f64 {
        let filtered = self.filtered_count();
        let total = filtered + self.dispatched_count();
        if total == 0 {
            return 0.0;
        }
        (filtered as f64 / total as f64) * 100.0
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.writer_failures.store(0, Ordering::Relaxed);
    }
}
