//! Cache validation
//!
//! `ETag` generation and `If-None-Match` handling for conditional requests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Compute a quoted `ETag` for a response body.
///
/// The tag combines the content length with a hash of the bytes, so files of
/// equal length still get distinct tags.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Check whether the client's `If-None-Match` header matches our `ETag`.
///
/// Handles a single tag, a comma-separated list, and the `*` wildcard.
/// A match means the client's copy is current and a 304 should be returned.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .any(|tag| tag.trim() == etag || tag.trim() == "*")
    })
}
