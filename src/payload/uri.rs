//! URI component escaping.
//!
//! Matches the browser's `encodeURIComponent`: ASCII letters, digits and
//! `- _ . ! ~ * ' ( )` pass through, everything else is percent-encoded
//! from its UTF-8 bytes with uppercase hex.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped by [`encode_component`].
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query parameter value.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
