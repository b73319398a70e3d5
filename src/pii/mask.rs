//! Same-length redaction of detected values.

/// Symbol written in place of every character of a masked value.
pub const REDACTION_CHAR: char = 'X';

/// Replace every Unicode code point of `value` with [`REDACTION_CHAR`].
///
/// The result has as many characters as the input, so multi-byte input
/// produces a mask shorter in bytes than the input.
pub fn mask_value(value: &str) -> String {
    value.chars().map(|_| REDACTION_CHAR).collect()
}
