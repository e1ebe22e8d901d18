//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Sweep: reaps expired keys from a bucket at a fixed interval
//! - Info Refresh: re-reads process memory usage for the info endpoint

mod info_refresh;
mod sweep;

pub use info_refresh::spawn_info_refresh_task;
pub use sweep::spawn_sweep_task;
