//! Lightweight operation counters for a page store.
//!
//! Only current totals are kept: atomic counters, relaxed ordering, no history.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Profiling statistics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileStats {
    // Operations
    pub total_puts: u64,
    pub total_gets: u64,
    pub total_deletes: u64,
    pub total_misses: u64,
    pub rejected_puts: u64,

    // Data Volume
    pub total_bytes_written: u64,
    pub total_bytes_read: u64,

    // Resident State
    pub resident_pages: u64,
    pub resident_bytes: u64,

    pub uptime_secs: u64,
}

impl ProfileStats {
    /// Fraction of lookups (get + delete) that missed
    pub fn miss_ratio(&self) -> f64 {
        let lookups = self.total_gets + self.total_deletes + self.total_misses;
        if lookups > 0 {
            self.total_misses as f64 / lookups as f64
        } else {
            0.0
        }
    }

    /// Average page size written in bytes
    #[inline]
    pub fn avg_put_size(&self) -> u64 {
        if self.total_puts > 0 {
            self.total_bytes_written / self.total_puts
        } else {
            0
        }
    }
}

/// Profiler - lock-free metric tracking
#[derive(Debug)]
pub struct Profiler {
    total_puts: AtomicU64,
    total_gets: AtomicU64,
    total_deletes: AtomicU64,
    total_misses: AtomicU64,
    rejected_puts: AtomicU64,

    total_bytes_written: AtomicU64,
    total_bytes_read: AtomicU64,

    resident_pages: AtomicU64,
    resident_bytes: AtomicU64,

    start_time: Instant,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiler {
    pub fn new() -> Self {
        Self {
            total_puts: AtomicU64::new(0),
            total_gets: AtomicU64::new(0),
            total_deletes: AtomicU64::new(0),
            total_misses: AtomicU64::new(0),
            rejected_puts: AtomicU64::new(0),
            total_bytes_written: AtomicU64::new(0),
            total_bytes_read: AtomicU64::new(0),
            resident_pages: AtomicU64::new(0),
            resident_bytes: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Get current statistics snapshot
    pub fn stats(&self) -> ProfileStats {
        ProfileStats {
            total_puts: self.total_puts.load(Ordering::Relaxed),
            total_gets: self.total_gets.load(Ordering::Relaxed),
            total_deletes: self.total_deletes.load(Ordering::Relaxed),
            total_misses: self.total_misses.load(Ordering::Relaxed),
            rejected_puts: self.rejected_puts.load(Ordering::Relaxed),
            total_bytes_written: self.total_bytes_written.load(Ordering::Relaxed),
            total_bytes_read: self.total_bytes_read.load(Ordering::Relaxed),
            resident_pages: self.resident_pages.load(Ordering::Relaxed),
            resident_bytes: self.resident_bytes.load(Ordering::Relaxed),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Record a stored page. `replaced` is the length of the page it overwrote, if any.
    pub(crate) fn record_put(&self, size: usize, replaced: Option<usize>) {
        self.total_puts.fetch_add(1, Ordering::Relaxed);
        self.total_bytes_written
            .fetch_add(size as u64, Ordering::Relaxed);
        self.resident_bytes.fetch_add(size as u64, Ordering::Relaxed);

        match replaced {
            Some(old) => {
                saturating_sub(&self.resident_bytes, old as u64);
            }
            None => {
                self.resident_pages.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub(crate) fn record_rejected_put(&self) {
        self.rejected_puts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_get(&self, size: usize) {
        self.total_gets.fetch_add(1, Ordering::Relaxed);
        self.total_bytes_read
            .fetch_add(size as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_delete(&self, size: usize) {
        self.total_deletes.fetch_add(1, Ordering::Relaxed);
        saturating_sub(&self.resident_pages, 1);
        saturating_sub(&self.resident_bytes, size as u64);
    }

    pub(crate) fn record_miss(&self) {
        self.total_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Everything resident was dropped at once
    pub(crate) fn record_clear(&self) {
        self.resident_pages.store(0, Ordering::Relaxed);
        self.resident_bytes.store(0, Ordering::Relaxed);
    }
}

/// Resident gauges never wrap below zero, even if a decrement lands first
fn saturating_sub(counter: &AtomicU64, amount: u64) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
        Some(current.saturating_sub(amount))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_overwrite_and_delete() {
        let profiler = Profiler::new();
        profiler.record_put(100, None);
        profiler.record_put(40, Some(100));
        profiler.record_put(10, None);

        let stats = profiler.stats();
        assert_eq!(stats.total_puts, 3);
        assert_eq!(stats.total_bytes_written, 150);
        assert_eq!(stats.resident_pages, 2);
        assert_eq!(stats.resident_bytes, 50);
        assert_eq!(stats.avg_put_size(), 50);

        profiler.record_delete(40);
        let stats = profiler.stats();
        assert_eq!(stats.resident_pages, 1);
        assert_eq!(stats.resident_bytes, 10);
    }

    #[test]
    fn test_miss_ratio() {
        let profiler = Profiler::new();
        assert_eq!(profiler.stats().miss_ratio(), 0.0);

        profiler.record_get(8);
        profiler.record_miss();
        let stats = profiler.stats();
        assert_eq!(stats.total_bytes_read, 8);
        assert_eq!(stats.miss_ratio(), 0.5);
    }

    #[test]
    fn test_clear() {
        let profiler = Profiler::new();
        profiler.record_put(10, None);
        profiler.record_rejected_put();
        profiler.record_clear();

        let stats = profiler.stats();
        assert_eq!(stats.resident_pages, 0);
        assert_eq!(stats.resident_bytes, 0);
        assert_eq!(stats.total_puts, 1);
        assert_eq!(stats.rejected_puts, 1);
    }

    #[test]
    fn test_resident_gauges_do_not_wrap() {
        let profiler = Profiler::new();
        profiler.record_delete(64);
        profiler.record_put(10, Some(100));

        let stats = profiler.stats();
        assert_eq!(stats.resident_pages, 0);
        assert_eq!(stats.resident_bytes, 0);
        assert_eq!(stats.total_deletes, 1);
    }
}
