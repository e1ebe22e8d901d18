//! Cache Service Module
//!
//! Owns the fixed array of buckets and routes every operation to one of them.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{route, Bucket, CacheEntry, CacheStats, Lookup};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

// == Cache Service ==
/// The sharded cache.
///
/// Buckets sit behind `Arc` so the routing path and the sweep tasks always
/// reach the single canonical instance for an index.
#[derive(Debug)]
pub struct CacheService {
    buckets: Box<[Arc<Bucket>]>,
}

impl CacheService {
    // == Constructor ==
    /// Creates `bucket_count` empty buckets without starting any sweep task.
    pub fn new(bucket_count: usize) -> Result<Self> {
        if bucket_count == 0 {
            return Err(CacheError::InvalidConfiguration(
                "bucket count must be positive".to_string(),
            ));
        }

        let buckets = (0..bucket_count)
            .map(|index| Arc::new(Bucket::new(index)))
            .collect();

        Ok(Self { buckets })
    }

    /// Creates the buckets and starts one periodic sweep task per bucket.
    ///
    /// The sweep tasks run for the rest of the process. Must be called from
    /// within a tokio runtime.
    pub fn initialize(bucket_count: usize, sweep_interval: Duration) -> Result<Self> {
        let service = Self::new(bucket_count)?;

        for bucket in service.buckets.iter() {
            // Detached: sweeping stops only with the runtime.
            let _ = spawn_sweep_task(Arc::clone(bucket), sweep_interval);
        }

        info!(
            "Initialized {} buckets with a sweep every {:?}",
            bucket_count, sweep_interval
        );
        Ok(service)
    }

    // == Routing ==
    /// Returns the bucket that owns `key`.
    pub fn bucket_for(&self, key: &str) -> &Arc<Bucket> {
        &self.buckets[route(key, self.buckets.len())]
    }

    /// Returns the bucket at `index`, if any.
    pub fn bucket(&self, index: usize) -> Option<&Arc<Bucket>> {
        self.buckets.get(index)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    // == Operations ==
    /// Stores `value` under `key`; a zero `ttl` never expires.
    pub async fn put(&self, key: String, value: String, ttl: Duration) {
        self.bucket_for(&key).put(key, value, ttl).await
    }

    /// Fetches the live entry for `key`.
    ///
    /// Expired and absent keys both come back as [`CacheError::NotFound`].
    pub async fn get(&self, key: &str) -> Result<CacheEntry> {
        match self.bucket_for(key).get(key).await {
            Lookup::Hit(entry) => Ok(entry),
            Lookup::Expired(_) | Lookup::Missing => Err(CacheError::NotFound(key.to_string())),
        }
    }

    /// Removes `key`. Returns true if something was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.bucket_for(key).delete(key).await
    }

    // == Stats ==
    /// Sums every bucket's counters.
    ///
    /// Takes no bucket lock; the totals are not a consistent cut across
    /// buckets or fields.
    pub fn stats(&self) -> CacheStats {
        self.buckets.iter().map(|bucket| bucket.stats()).sum()
    }

    /// Number of entries stored across all buckets.
    pub async fn len(&self) -> usize {
        let mut total = 0;
        for bucket in self.buckets.iter() {
            total += bucket.len().await;
        }
        total
    }

    /// Returns true if no bucket stores anything.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
