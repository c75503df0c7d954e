//! Conditional request helpers
//!
//! Static assets carry a content-hash `ETag`; a matching `If-None-Match` gets a 304.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Strong `ETag` for a body: `"<len>-<hash>"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Whether `If-None-Match` covers `etag`
///
/// Accepts a single tag, a comma list or `*`. `If-None-Match` uses the weak
/// comparison, so a `W/` prefix on the client's tag is ignored.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header.split(',').map(str::trim).any(|tag| {
            tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == etag
        })
    })
}
