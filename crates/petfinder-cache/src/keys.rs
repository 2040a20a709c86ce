//! Cache key builders for all PetFinder cache entries.
//!
//! Keys are relative; the Redis provider adds the configured prefix.

/// Version tag bumped whenever the cached feed shape changes.
const FEED_VERSION: &str = "v1";

/// Cache key for the default public listing feed (no filters, first page).
pub fn pet_feed() -> String {
    format!("pets:feed:{FEED_VERSION}")
}

/// Cache key holding the current feed generation, replaced on every listing change.
pub fn pet_feed_generation() -> String {
    "pets:feed:generation".to_string()
}
