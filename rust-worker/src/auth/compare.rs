//! Constant-time string comparison.

/// Compare two strings without leaking where they first differ.
///
/// When the lengths differ, the loop still runs over the full length of
/// `expected` (comparing it against itself), so the elapsed time does not
/// reveal the length of `actual`; the result is forced to `false`.
///
/// This is a hardening utility for secret-derived values, not a general
/// string equality. Never replace it with a short-circuiting check.
pub fn constant_time_compare(expected: &str, actual: &str) -> bool {
    let expected = expected.as_bytes();
    let actual = actual.as_bytes();

    let (other, mut result) = if expected.len() == actual.len() {
        (actual, 0u8)
    } else {
        (expected, 1u8)
    };

    for (x, y) in expected.iter().zip(other.iter()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_strings() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(constant_time_compare("", ""));
        assert!(constant_time_compare(
            "sha256=c8e1211e6d7cf6fa6e3e68f6ee51b98c",
            "sha256=c8e1211e6d7cf6fa6e3e68f6ee51b98c"
        ));
    }

    #[test]
    fn test_unequal_strings() {
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "xbc"));
        assert!(!constant_time_compare("abc", "abC"));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(!constant_time_compare("abc", "abcd"));
        assert!(!constant_time_compare("abcd", "abc"));
        assert!(!constant_time_compare("", "a"));
        assert!(!constant_time_compare("a", ""));
    }
}
