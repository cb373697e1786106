//! String-format predicates
//!
//! Each predicate classifies a string as conforming to a named format
//! (`date-time`, `email`, `hostname`, ...). Predicates are plain
//! `fn(&str) -> bool` functions so the validation engine can register them
//! in its name-keyed format table without any trait machinery.
//!
//! The predicates are intentionally pragmatic: they accept the shapes that
//! show up in real documents rather than enforcing every corner of the
//! underlying RFCs.

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])$").expect("date regex")
});

static TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[01]\d|2[0-3]):[0-5]\d:(?:[0-5]\d|60)(?:\.\d+)?(?:[Zz]|[+-](?:[01]\d|2[0-3]):[0-5]\d)?$")
        .expect("time regex")
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
        .expect("email regex")
});

// Label syntax only; the 253-character total bound is checked in `hostname()`.
static HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.?$")
        .expect("hostname regex")
});

static URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:[^\s]*$").expect("uri regex")
});

static URI_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s]*$").expect("uri-reference regex"));

static JSON_POINTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:/(?:[^~/]|~0|~1)*)*$").expect("json-pointer regex"));

static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$")
        .expect("uuid regex")
});

/// RFC 3339 date-time (`2024-01-15T10:30:00Z`, fractional seconds and
/// numeric offsets allowed).
pub fn date_time(s: &str) -> bool {
    let Some((date, time)) = s.split_once(['T', 't']) else {
        return false;
    };
    DATE.is_match(date) && TIME.is_match(time)
}

/// Full date (`2024-01-15`). Day-of-month is bounds-checked syntactically,
/// not against the calendar.
pub fn date(s: &str) -> bool {
    DATE.is_match(s)
}

/// Time of day with optional fractional seconds and offset (`10:30:00Z`).
pub fn time(s: &str) -> bool {
    TIME.is_match(s)
}

/// Email address, pragmatic form: dot-atom local part, hostname domain.
pub fn email(s: &str) -> bool {
    EMAIL.is_match(s)
}

/// RFC 1034 hostname: dot-separated labels of at most 63 characters,
/// 253 characters total, no leading or trailing hyphen in a label.
pub fn hostname(s: &str) -> bool {
    s.len() <= 253 && !s.is_empty() && HOSTNAME.is_match(s)
}

/// IPv4 dotted-quad address.
pub fn ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

/// IPv6 address, including compressed (`::`) forms.
pub fn ipv6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

/// Absolute URI: a scheme followed by a colon and no whitespace.
pub fn uri(s: &str) -> bool {
    URI.is_match(s)
}

/// URI reference: either an absolute URI or a relative reference.
pub fn uri_reference(s: &str) -> bool {
    URI_REFERENCE.is_match(s)
}

/// RFC 6901 JSON pointer (`/a/b/0`, `~0` and `~1` escapes).
pub fn json_pointer(s: &str) -> bool {
    JSON_POINTER.is_match(s)
}

/// A string that is itself a valid regular expression.
pub fn regex_syntax(s: &str) -> bool {
    Regex::new(s).is_ok()
}

/// Hyphenated UUID (`123e4567-e89b-12d3-a456-426614174000`).
pub fn uuid(s: &str) -> bool {
    UUID.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_time() {
        assert!(date_time("2024-01-15T10:30:00Z"));
        assert!(date_time("2024-01-15T10:30:00.123+02:00"));
        assert!(date_time("2024-12-31t23:59:60z"));
        assert!(!date_time("2024-01-15 10:30:00Z"));
        assert!(!date_time("2024-13-01T10:30:00Z"));
        assert!(!date_time("not a date"));
    }

    #[test]
    fn test_date() {
        assert!(date("2024-01-15"));
        assert!(date("1999-12-31"));
        assert!(!date("2024-00-15"));
        assert!(!date("2024-01-32"));
        assert!(!date("24-01-15"));
    }

    #[test]
    fn test_time() {
        assert!(time("10:30:00"));
        assert!(time("23:59:60Z"));
        assert!(time("00:00:00.5-07:00"));
        assert!(!time("24:00:00"));
        assert!(!time("10:61:00"));
    }

    #[test]
    fn test_email() {
        assert!(email("user@example.com"));
        assert!(email("first.last+tag@sub.example.org"));
        assert!(!email("no-at-sign"));
        assert!(!email("user@"));
        assert!(!email("user@-bad.example"));
    }

    #[test]
    fn test_hostname() {
        assert!(hostname("example.com"));
        assert!(hostname("sub.example.com."));
        assert!(hostname("localhost"));
        assert!(!hostname(""));
        assert!(!hostname("-leading.example"));
        assert!(!hostname("exa mple.com"));
        // 254 characters exceeds the total bound
        let long = format!("{}.com", "a".repeat(250));
        assert!(!hostname(&long));
    }

    #[test]
    fn test_ipv4() {
        assert!(ipv4("192.168.0.1"));
        assert!(ipv4("0.0.0.0"));
        assert!(!ipv4("256.0.0.1"));
        assert!(!ipv4("192.168.0"));
        assert!(!ipv4("::1"));
    }

    #[test]
    fn test_ipv6() {
        assert!(ipv6("::1"));
        assert!(ipv6("2001:db8::8a2e:370:7334"));
        assert!(!ipv6("192.168.0.1"));
        assert!(!ipv6("2001:db8::g"));
    }

    #[test]
    fn test_uri() {
        assert!(uri("https://example.com/path?q=1"));
        assert!(uri("mailto:user@example.com"));
        assert!(!uri("//example.com/relative"));
        assert!(!uri("http://exa mple.com"));
    }

    #[test]
    fn test_uri_reference() {
        assert!(uri_reference("/relative/path"));
        assert!(uri_reference("https://example.com"));
        assert!(uri_reference(""));
        assert!(!uri_reference("with space"));
    }

    #[test]
    fn test_json_pointer() {
        assert!(json_pointer(""));
        assert!(json_pointer("/a/b/0"));
        assert!(json_pointer("/a~0b/~1c"));
        assert!(!json_pointer("a/b"));
        assert!(!json_pointer("/a~2"));
    }

    #[test]
    fn test_regex_syntax() {
        assert!(regex_syntax("^[a-z]+$"));
        assert!(!regex_syntax("(unclosed"));
    }

    #[test]
    fn test_uuid() {
        assert!(uuid("123e4567-e89b-12d3-a456-426614174000"));
        assert!(uuid("123E4567-E89B-12D3-A456-426614174000"));
        assert!(!uuid("123e4567e89b12d3a456426614174000"));
        assert!(!uuid("123e4567-e89b-12d3-a456-42661417400"));
    }
}
