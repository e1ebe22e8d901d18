//! Stampy - A sharded in-memory cache server
//!
//! Keys are spread over independently locked buckets, with optional TTL
//! expiry enforced on read and by a periodic per-bucket sweep.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod info;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheService;
pub use config::Config;
pub use tasks::{spawn_info_refresh_task, spawn_sweep_task};
