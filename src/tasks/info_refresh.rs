//! Info Refresh Task
//!
//! Background task that keeps the memory usage in the server info current.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::info::{current_memory_usage, ServerInfo};

/// Spawns a background task that refreshes `info.memory_usage` every `interval`.
///
/// The memory reading is taken before the write lock, so readers of the info
/// endpoint only wait for the field swap.
pub fn spawn_info_refresh_task(info: Arc<RwLock<ServerInfo>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;

            let usage = current_memory_usage();
            debug!("Memory usage refreshed: {}", usage);
            info.write().await.memory_usage = usage;
        }
    })
}
