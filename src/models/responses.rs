//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats};

/// Response body for GET /v1/cache/*key
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
    /// When the key was put
    pub creation_date: DateTime<Utc>,
    /// When the key was read, i.e. now
    pub last_accessed: DateTime<Utc>,
    /// Absolute expiry, null for permanent keys
    pub expiry_time: Option<DateTime<Utc>>,
}

impl GetResponse {
    /// Creates a new GetResponse from a cache entry
    pub fn new(key: impl Into<String>, entry: CacheEntry) -> Self {
        Self {
            key: key.into(),
            value: entry.value,
            creation_date: entry.created_at,
            last_accessed: entry.last_accessed_at,
            expiry_time: entry.expires_at,
        }
    }
}

/// Response body for PUT /v1/cache/*key
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl PutResponse {
    /// Creates a new PutResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /v1/cache/*key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted", key),
            key,
        }
    }
}

/// Response body for GET /v1/cache
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Puts without a TTL
    pub key_puts: u64,
    /// Keys removed by any path
    pub key_deletes: u64,
    /// Successful lookups
    pub key_hits: u64,
    /// Lookups of absent keys
    pub absent_key_hits: u64,
    /// Keys reaped by the sweep
    pub expired_keys: u64,
    /// Lookups that found an expired key
    pub expired_key_hits: u64,
    /// Hit rate over all lookups
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            key_puts: stats.puts,
            key_deletes: stats.deletes,
            key_hits: stats.hits,
            absent_key_hits: stats.absent_hits,
            expired_keys: stats.expired_keys,
            expired_key_hits: stats.expired_key_hits,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
