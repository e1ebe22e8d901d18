//! TTL Sweep Task
//!
//! Background task that periodically reaps expired keys from one bucket.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Bucket;

/// Spawns a background task that periodically sweeps expired keys from `bucket`.
///
/// The task runs in an infinite loop, sleeping for `interval` between sweeps.
/// Each sweep locks one key at a time, so foreground traffic on the bucket
/// keeps flowing while it runs.
///
/// # Returns
/// A JoinHandle for the spawned task. The cache service detaches it; tests
/// use it to abort.
pub fn spawn_sweep_task(bucket: Arc<Bucket>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!(
            "Starting TTL sweep for bucket {} with interval of {:?}",
            bucket.index(),
            interval
        );

        loop {
            tokio::time::sleep(interval).await;

            let reaped = bucket.sweep_expired(Utc::now()).await;

            if reaped > 0 {
                info!(
                    "TTL sweep: bucket {} reaped {} expired keys",
                    bucket.index(),
                    reaped
                );
            } else {
                debug!("TTL sweep: bucket {} had no expired keys", bucket.index());
            }
        }
    })
}
