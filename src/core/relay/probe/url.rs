//! URL composition for relayed fetches.
//!
//! A relayed URL is the endpoint's prefix with the percent-encoded target
//! appended, so query-style prefixes (`...?url=`) receive the target as a
//! single query value.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters that pass through unencoded: the unreserved set the public
/// forwarders expect for their query values (encodeURIComponent semantics).
const TARGET_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a target URL for embedding in a forwarder prefix.
pub fn encode_target(target: &str) -> String {
    utf8_percent_encode(target, TARGET_ENCODE_SET).to_string()
}

/// Compose the outgoing URL: `prefix + encode_target(target)`.
///
/// # Examples
/// - `"https://api.allorigins.win/raw?url="` + `"https://example.com/a b"`
///   → `"https://api.allorigins.win/raw?url=https%3A%2F%2Fexample.com%2Fa%20b"`
pub fn compose_proxied_url(prefix: &str, target: &str) -> String {
    format!("{}{}", prefix, encode_target(target))
}
