//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// When the key was last put
    pub created_at: DateTime<Utc>,
    /// When the entry was last handed out by a successful get
    pub last_accessed_at: DateTime<Utc>,
    /// Absolute expiry, None = permanent until deleted
    pub expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped at `now`.
    ///
    /// A zero `ttl` produces a permanent entry. Otherwise the expiry is fixed
    /// here once and never recomputed until the key is put again.
    pub fn new(value: String, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            value,
            created_at: now,
            last_accessed_at: now,
            expires_at: expiry_from(now, ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches the
    /// expiration time, so a TTL of `d` is visible strictly before `put + d`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Returns true if the entry carries a TTL.
    pub fn has_ttl(&self) -> bool {
        self.expires_at.is_some()
    }

    // == Touch ==
    /// Returns a copy with the access time moved to `now`.
    pub fn accessed(&self, now: DateTime<Utc>) -> Self {
        Self {
            last_accessed_at: now,
            ..self.clone()
        }
    }
}

// == Utility Functions ==
/// Computes the absolute expiry for a relative TTL.
///
/// Returns `None` for a zero TTL. A TTL too large to represent saturates at
/// the maximum timestamp.
pub fn expiry_from(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    if ttl.is_zero() {
        return None;
    }

    let expires = TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    Some(expires)
}
