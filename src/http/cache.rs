//! `ETag` generation and conditional request checks.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hash file contents into a quoted `ETag` value, e.g. `"a1b2c3"`.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Does the client's `If-None-Match` header match our `ETag`?
///
/// Handles comma-separated candidate lists and the `*` wildcard. A match
/// means the client's copy is current and a 304 is due.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header.split(',').any(|candidate| {
            let candidate = candidate.trim();
            candidate == etag || candidate == "*"
        })
    })
}
