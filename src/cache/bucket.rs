//! Cache Bucket Module
//!
//! One independently locked shard of the key-space.
//!
//! Keys are striped over two locks by class: TTL-bearing keys live under one
//! `RwLock`, permanent keys under the other, so expiry housekeeping and
//! steady-state traffic on permanent keys rarely contend. The TTL-key set is
//! the key set of the TTL map, so it cannot diverge from the stored entries.
//! Its size is mirrored in an atomic counter, updated under the TTL write
//! lock, so a sweep of an empty TTL set takes no lock at all.
//!
//! Whenever both locks are held, the TTL lock is taken first.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{BucketStats, CacheEntry, CacheStats};

// == Lookup ==
/// Outcome of a bucket read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Live entry, with `last_accessed_at` set to the read time
    Hit(CacheEntry),
    /// The key was present but past its expiry; it has been reaped
    Expired(CacheEntry),
    /// No such key
    Missing,
}

impl Lookup {
    /// Returns the live entry, treating expired keys as absent.
    pub fn into_hit(self) -> Option<CacheEntry> {
        match self {
            Lookup::Hit(entry) => Some(entry),
            Lookup::Expired(_) | Lookup::Missing => None,
        }
    }
}

// == Bucket ==
/// A shard of the cache with its own locks and statistics.
#[derive(Debug)]
pub struct Bucket {
    index: usize,
    /// TTL-bearing keys
    ttl_entries: RwLock<HashMap<String, CacheEntry>>,
    /// Keys without expiry
    permanent: RwLock<HashMap<String, CacheEntry>>,
    /// Size of `ttl_entries`
    ttl_count: AtomicUsize,
    stats: BucketStats,
}

impl Bucket {
    // == Constructor ==
    /// Creates an empty bucket with zeroed statistics.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ttl_entries: RwLock::new(HashMap::new()),
            permanent: RwLock::new(HashMap::new()),
            ttl_count: AtomicUsize::new(0),
            stats: BucketStats::new(),
        }
    }

    /// Position of this bucket in the service's bucket array.
    pub fn index(&self) -> usize {
        self.index
    }

    // == Put ==
    /// Stores `value` under `key`. A zero `ttl` stores a permanent entry.
    ///
    /// Only permanent puts are counted in the `puts` statistic.
    pub async fn put(&self, key: String, value: String, ttl: Duration) {
        self.put_at(key, value, ttl, Utc::now()).await
    }

    /// Same as [`Bucket::put`] with an explicit clock reading.
    pub async fn put_at(&self, key: String, value: String, ttl: Duration, now: DateTime<Utc>) {
        let entry = CacheEntry::new(value, ttl, now);

        if let Some(expires_at) = entry.expires_at {
            debug!(
                "Bucket {}: putting key '{}' valid until {}",
                self.index, key, expires_at
            );

            let mut ttl_entries = self.ttl_entries.write().await;
            let was_permanent = self.permanent.read().await.contains_key(&key);
            if was_permanent {
                self.permanent.write().await.remove(&key);
            }
            if ttl_entries.insert(key, entry).is_none() {
                self.ttl_count.fetch_add(1, Ordering::Relaxed);
            }
            return;
        }

        debug!("Bucket {}: putting permanent key '{}'", self.index, key);

        // A shared TTL lock keeps TTL puts of this key out while we insert.
        {
            let ttl_entries = self.ttl_entries.read().await;
            if !ttl_entries.contains_key(&key) {
                self.permanent.write().await.insert(key, entry);
                self.stats.record_put();
                return;
            }
        }

        // The key currently carries a TTL: move it across classes.
        let mut ttl_entries = self.ttl_entries.write().await;
        let mut permanent = self.permanent.write().await;
        if ttl_entries.remove(&key).is_some() {
            self.ttl_count.fetch_sub(1, Ordering::Relaxed);
        }
        permanent.insert(key, entry);
        self.stats.record_put();
    }

    // == Get ==
    /// Looks up `key`, reaping it if it has expired.
    pub async fn get(&self, key: &str) -> Lookup {
        self.get_at(key, Utc::now()).await
    }

    /// Same as [`Bucket::get`] with an explicit clock reading.
    ///
    /// The returned entry is a copy; its refreshed access time is not written
    /// back to the stored entry.
    pub async fn get_at(&self, key: &str, now: DateTime<Utc>) -> Lookup {
        let ttl_lookup = {
            let ttl_entries = self.ttl_entries.read().await;
            ttl_entries.get(key).map(|entry| {
                if entry.is_expired_at(now) {
                    self.stats.record_expired_key_hit();
                    Lookup::Expired(entry.clone())
                } else {
                    self.stats.record_hit();
                    Lookup::Hit(entry.accessed(now))
                }
            })
        };

        match ttl_lookup {
            Some(Lookup::Expired(entry)) => {
                debug!("Bucket {}: key '{}' has expired", self.index, key);
                // Read lock is released; reap under the write lock.
                if self.remove_expired(key, now).await {
                    self.stats.record_delete();
                }
                Lookup::Expired(entry)
            }
            Some(lookup) => lookup,
            None => self.get_permanent(key, now).await,
        }
    }

    async fn get_permanent(&self, key: &str, now: DateTime<Utc>) -> Lookup {
        let permanent = self.permanent.read().await;
        match permanent.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Lookup::Hit(entry.accessed(now))
            }
            None => {
                self.stats.record_absent_hit();
                debug!("Bucket {}: key '{}' not found", self.index, key);
                Lookup::Missing
            }
        }
    }

    // == Delete ==
    /// Removes `key` from whichever class holds it.
    ///
    /// Returns true if an entry was removed. Deleting an absent key is a no-op
    /// and leaves the statistics untouched.
    pub async fn delete(&self, key: &str) -> bool {
        let mut ttl_entries = self.ttl_entries.write().await;
        let removed = if ttl_entries.remove(key).is_some() {
            self.ttl_count.fetch_sub(1, Ordering::Relaxed);
            true
        } else {
            // Holding the TTL write lock stops the key changing class meanwhile.
            self.permanent.write().await.remove(key).is_some()
        };
        drop(ttl_entries);

        if removed {
            self.stats.record_delete();
            debug!("Bucket {}: deleted key '{}'", self.index, key);
        }
        removed
    }

    // == Sweep ==
    /// Reaps every TTL-bearing key expired as of `now`.
    ///
    /// Takes the TTL write lock once per reaped key, so foreground operations
    /// interleave with the sweep. An empty TTL set returns before any lock is
    /// taken. Returns the number of keys removed.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        if self.ttl_count.load(Ordering::Relaxed) == 0 {
            return 0;
        }

        let candidates: Vec<String> = {
            let ttl_entries = self.ttl_entries.read().await;
            ttl_entries
                .iter()
                .filter(|(_, entry)| entry.is_expired_at(now))
                .map(|(key, _)| key.clone())
                .collect()
        };

        let mut reaped = 0;
        for key in candidates {
            if self.remove_expired(&key, now).await {
                self.stats.record_delete();
                self.stats.record_expired_key();
                reaped += 1;
            }
        }
        reaped
    }

    /// Removes `key` only if it is still a TTL entry expired as of `now`.
    ///
    /// A concurrent re-put may have refreshed the key since it was observed.
    async fn remove_expired(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut ttl_entries = self.ttl_entries.write().await;
        let still_expired = ttl_entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));
        if still_expired {
            ttl_entries.remove(key);
            self.ttl_count.fetch_sub(1, Ordering::Relaxed);
        }
        still_expired
    }

    // == Inspection ==
    /// Returns a snapshot of this bucket's counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Number of entries stored, in both classes.
    pub async fn len(&self) -> usize {
        let ttl_len = self.ttl_entries.read().await.len();
        ttl_len + self.permanent.read().await.len()
    }

    /// Returns true if the bucket stores nothing.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of TTL-bearing keys.
    pub fn ttl_len(&self) -> usize {
        self.ttl_count.load(Ordering::Relaxed)
    }

    /// Returns true if `key` is currently tracked as TTL-bearing.
    pub async fn contains_ttl_key(&self, key: &str) -> bool {
        self.ttl_entries.read().await.contains_key(key)
    }
}
