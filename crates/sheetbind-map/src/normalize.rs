//! Column-name normalization used for header matching.

/// Keeps only ASCII letters and digits, preserving their order.
///
/// Whitespace, punctuation, symbols and non-ASCII characters are dropped, so
/// `"Emp Id"`, `"emp_id"` and `"EMP-ID"` all normalize to the same letters.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Compares two names after normalization, ignoring ASCII case.
pub fn equals_normalized(a: &str, b: &str) -> bool {
    let mut left = a.chars().filter(char::is_ascii_alphanumeric);
    let mut right = b.chars().filter(char::is_ascii_alphanumeric);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(l), Some(r)) if l.eq_ignore_ascii_case(&r) => {}
            _ => return false,
        }
    }
}

/// Normalized, lowercased matching key.
pub(crate) fn match_key(raw: &str) -> String {
    normalize(raw).to_ascii_lowercase()
}
