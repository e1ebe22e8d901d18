//! Cache Statistics Module
//!
//! Per-bucket counters and the aggregated snapshot reported over the API.

use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Bucket Stats ==
/// Live counters owned by a single bucket.
///
/// Counters are atomics so the service can sum them without taking the
/// bucket's locks. Fields are read one at a time; a snapshot is not a
/// consistent cut across fields.
#[derive(Debug, Default)]
pub struct BucketStats {
    puts: AtomicU64,
    deletes: AtomicU64,
    hits: AtomicU64,
    absent_hits: AtomicU64,
    expired_keys: AtomicU64,
    expired_key_hits: AtomicU64,
}

impl BucketStats {
    /// Creates a new BucketStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_absent_hit(&self) {
        self.absent_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A key reaped by the sweep.
    pub fn record_expired_key(&self) {
        self.expired_keys.fetch_add(1, Ordering::Relaxed);
    }

    /// A read that found the key already expired.
    pub fn record_expired_key_hit(&self) {
        self.expired_key_hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the current counter values.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            puts: self.puts.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            absent_hits: self.absent_hits.load(Ordering::Relaxed),
            expired_keys: self.expired_keys.load(Ordering::Relaxed),
            expired_key_hits: self.expired_key_hits.load(Ordering::Relaxed),
        }
    }
}

// == Cache Stats ==
/// Point-in-time counter values, for one bucket or summed over all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Puts without a TTL
    pub puts: u64,
    /// Keys actually removed, by any path
    pub deletes: u64,
    /// Successful lookups
    pub hits: u64,
    /// Lookups of permanent-class keys that were absent
    pub absent_hits: u64,
    /// Keys reaped by the sweep
    pub expired_keys: u64,
    /// Lookups that found an expired key
    pub expired_key_hits: u64,
}

impl CacheStats {
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates hits / (hits + absent hits + expired hits), or 0.0 with no lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.absent_hits + self.expired_key_hits;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl AddAssign for CacheStats {
    fn add_assign(&mut self, other: Self) {
        self.puts += other.puts;
        self.deletes += other.deletes;
        self.hits += other.hits;
        self.absent_hits += other.absent_hits;
        self.expired_keys += other.expired_keys;
        self.expired_key_hits += other.expired_key_hits;
    }
}

impl std::iter::Sum for CacheStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), |mut acc, stats| {
            acc += stats;
            acc
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = BucketStats::new().snapshot();
        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_record_each_counter() {
        let stats = BucketStats::new();
        stats.record_put();
        stats.record_put();
        stats.record_delete();
        stats.record_hit();
        stats.record_absent_hit();
        stats.record_expired_key();
        stats.record_expired_key_hit();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.puts, 2);
        assert_eq!(snapshot.deletes, 1);
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.absent_hits, 1);
        assert_eq!(snapshot.expired_keys, 1);
        assert_eq!(snapshot.expired_key_hits, 1);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = CacheStats {
            hits: 2,
            absent_hits: 1,
            expired_key_hits: 1,
            ..CacheStats::default()
        };
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_sum_adds_field_by_field() {
        let a = CacheStats {
            puts: 1,
            deletes: 2,
            hits: 3,
            absent_hits: 4,
            expired_keys: 5,
            expired_key_hits: 6,
        };
        let total: CacheStats = vec![a, a, CacheStats::new()].into_iter().sum();
        assert_eq!(total.puts, 2);
        assert_eq!(total.deletes, 4);
        assert_eq!(total.hits, 6);
        assert_eq!(total.absent_hits, 8);
        assert_eq!(total.expired_keys, 10);
        assert_eq!(total.expired_key_hits, 12);
    }
}
