//! The named-format registry.
//!
//! Formats are advisory by default; validation checks them only when a
//! type's options set `enforce_format`. The registry is fixed: unknown
//! format names are simply not checked.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

static REGISTRY: OnceLock<HashMap<&'static str, Regex>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, Regex> {
    REGISTRY.get_or_init(|| {
        let mut formats = HashMap::new();
        let mut add = |name: &'static str, pattern: &str| {
            formats.insert(name, Regex::new(pattern).expect("valid format regex"));
        };

        add("date", r"^\d{4}-\d{2}-\d{2}$");
        add("time", r"^\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2})?$");
        add(
            "date-time",
            r"^\d{4}-\d{2}-\d{2}[Tt ]\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2})?$",
        );
        add("email", r"^[^@\s]+@[^@\s]+\.[^@\s]+$");
        add(
            "hostname",
            r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
        );
        add("ipv4", r"^(\d{1,3}\.){3}\d{1,3}$");
        add("ipv6", r"^([0-9A-Fa-f]{0,4}:){1,7}[0-9A-Fa-f]{0,4}$");
        add(
            "uuid",
            r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
        );
        add("uri", r"^[A-Za-z][A-Za-z0-9+.-]*:\S+$");

        formats
    })
}

/// Returns the pattern registered for the given format name.
#[must_use]
pub fn format_pattern(format: &str) -> Option<&'static Regex> {
    registry().get(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format() {
        assert!(format_pattern("made-up").is_none());
    }

    #[test]
    fn test_date() {
        let pattern = format_pattern("date").unwrap();
        assert!(pattern.is_match("2024-01-31"));
        assert!(!pattern.is_match("January 31"));
    }

    #[test]
    fn test_date_time() {
        let pattern = format_pattern("date-time").unwrap();
        assert!(pattern.is_match("2018-11-13T20:20:39+00:00"));
        assert!(pattern.is_match("2018-11-13T20:20:39Z"));
        assert!(!pattern.is_match("2018-11-13"));
    }

    #[test]
    fn test_email() {
        let pattern = format_pattern("email").unwrap();
        assert!(pattern.is_match("user@example.com"));
        assert!(!pattern.is_match("not-an-email"));
    }

    #[test]
    fn test_ipv4() {
        let pattern = format_pattern("ipv4").unwrap();
        assert!(pattern.is_match("127.0.0.1"));
        assert!(!pattern.is_match("127.0.0"));
    }

    #[test]
    fn test_uuid() {
        let pattern = format_pattern("uuid").unwrap();
        assert!(pattern.is_match("3e4666bf-d5e5-4aa7-b8ce-cefe41c7568a"));
        assert!(!pattern.is_match("3e4666bf"));
    }

    #[test]
    fn test_uri() {
        let pattern = format_pattern("uri").unwrap();
        assert!(pattern.is_match("https://example.com/path"));
        assert!(pattern.is_match("mailto:user@example.com"));
        assert!(!pattern.is_match("just text"));
    }
}
