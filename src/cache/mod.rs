//! Cache Module
//!
//! Provides a sharded in-memory cache with TTL expiration.

mod bucket;
mod entry;
mod router;
mod service;
mod stats;


// Re-export public types
pub use bucket::{Bucket, Lookup};
pub use entry::CacheEntry;
pub use router::route;
pub use service::CacheService;
pub use stats::{BucketStats, CacheStats};
