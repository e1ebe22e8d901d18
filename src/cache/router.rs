//! Key Routing Module
//!
//! Maps a key to the bucket that owns it.

use xxhash_rust::xxh3::xxh3_64;

// == Route ==
/// Returns the bucket index in `[0, bucket_count)` that owns `key`.
///
/// Uses XXH3-64 over the key bytes with the default seed, so the mapping is
/// stable across calls and across process runs for a fixed bucket count.
///
/// # Panics
/// If `bucket_count` is zero. The service rejects that at construction.
pub fn route(key: &str, bucket_count: usize) -> usize {
    assert!(bucket_count > 0, "bucket_count must be > 0");
    (xxh3_64(key.as_bytes()) % bucket_count as u64) as usize
}
