//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;

/// Request body for PUT /v1/cache/*key
///
/// # Fields
/// - `value`: The value to store
/// - `timeToLive`: TTL in seconds, 0 or absent means no expiration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutRequest {
    /// The value to store
    pub value: String,
    /// TTL in seconds
    #[serde(default)]
    pub time_to_live: u64,
}

impl PutRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.value.is_empty() {
            return Some("Value cannot be empty".to_string());
        }
        None
    }

    /// The TTL as a duration; zero means the entry never expires.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.time_to_live)
    }
}
