//! Server Info Module
//!
//! Description of the running process, served at `/v1/info`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sysinfo::System;

/// Name reported by the info endpoint.
pub const SERVER_NAME: &str = "Stampy, Elephant in the room";

/// Process information captured at startup.
///
/// Everything except `memory_usage` is fixed for the life of the process;
/// memory usage is refreshed by a background task.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    /// `<os>-<arch>`
    pub os: String,
    pub cpu_cores: usize,
    /// Resident memory of this process, e.g. `"12.50 mb"`
    pub memory_usage: String,
    pub bucket_count: usize,
    pub started: DateTime<Utc>,
}

impl ServerInfo {
    /// Collects the process description for a cache with `bucket_count` buckets.
    pub fn collect(bucket_count: usize) -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            os: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            cpu_cores: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            memory_usage: current_memory_usage(),
            bucket_count,
            started: Utc::now(),
        }
    }
}

/// Formatted resident memory of this process, or `"unknown"`.
pub fn current_memory_usage() -> String {
    resident_memory_bytes()
        .map(format_memory)
        .unwrap_or_else(|| "unknown".to_string())
}

/// Resident memory of the current process in bytes, if the platform reports it.
pub fn resident_memory_bytes() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    if !system.refresh_process(pid) {
        return None;
    }
    system.process(pid).map(|process| process.memory())
}

/// Formats a byte count as kb, switching to mb and then gb above 1024 units.
pub fn format_memory(bytes: u64) -> String {
    let mut amount = bytes as f64 / 1024.0;
    let mut unit = "kb";

    if amount > 1024.0 {
        amount /= 1024.0;
        unit = "mb";

        if amount > 1024.0 {
            amount /= 1024.0;
            unit = "gb";
        }
    }

    format!("{:.2} {}", amount, unit)
}
