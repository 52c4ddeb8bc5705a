//! Path-key splitting.
//!
//! Wire keys address nested values with a delimiter grammar: segments are
//! separated by `.` or bracket pairs, and a trailing `]` is trimmed, so
//! `items[0][name]` and `items.0.name` both split to
//! `["items", "0", "name"]`.

use std::sync::OnceLock;

use regex::Regex;

static KEY_SPLITTER: OnceLock<Regex> = OnceLock::new();

fn key_splitter() -> &'static Regex {
    KEY_SPLITTER.get_or_init(|| Regex::new(r"[\]\[.]+").expect("valid key splitter"))
}

/// Splits a wire key into its path segments.
#[must_use]
pub fn split_key(key: &str) -> Vec<&str> {
    let trimmed = key.trim_end_matches(']');
    key_splitter().split(trimmed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_key() {
        assert_eq!(split_key("name"), vec!["name"]);
    }

    #[test]
    fn test_bracket_segments() {
        assert_eq!(split_key("items[0][name]"), vec!["items", "0", "name"]);
    }

    #[test]
    fn test_dot_segments() {
        assert_eq!(split_key("items.0.name"), vec!["items", "0", "name"]);
    }

    #[test]
    fn test_mixed_segments() {
        assert_eq!(split_key("a[0].b[c]"), vec!["a", "0", "b", "c"]);
    }

    #[test]
    fn test_trailing_bracket_trimmed() {
        assert_eq!(split_key("items[0]"), vec!["items", "0"]);
    }

    #[test]
    fn test_empty_bracket_yields_empty_segment() {
        assert_eq!(split_key("tags[]"), vec!["tags", ""]);
    }
}
