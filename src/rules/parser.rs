//! Rule-string parsing.
//!
//! A rule maps an inbound path prefix to an upstream host and port:
//!
//! ```text
//! /api -> backend1:8080
//! /    -> backend2
//! ```
//!
//! The port is optional and defaults to 80.

use thiserror::Error;

/// Separator between the path prefix and the upstream target.
const SEPARATOR: &str = "->";

/// Default upstream port when the rule omits one.
const DEFAULT_PORT: u16 = 80;

/// A single parsed routing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRule {
    /// Inbound path prefix to match.
    pub source_prefix: String,

    /// Upstream host the traffic is forwarded to.
    pub target_host: String,

    /// Upstream port (1-65535).
    pub target_port: u16,
}

/// Errors produced when a rule string cannot be parsed.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The rule is missing the separator, the prefix, or the host.
    #[error("malformed rule {rule:?}: expected \"prefix -> host[:port]\"")]
    MalformedRule { rule: String },

    /// The port suffix is present but not an integer in 1-65535.
    #[error("invalid port {port:?} in rule {rule:?}: expected an integer in 1-65535")]
    InvalidPort { rule: String, port: String },
}

/// Parse a single `prefix -> host[:port]` mapping.
///
/// Pure function: no I/O, no resolution, same input always yields the
/// same rule.
pub fn parse(raw: &str) -> Result<DomainRule, ParseError> {
    let malformed = || ParseError::MalformedRule {
        rule: raw.to_string(),
    };

    let parts: Vec<&str> = raw.split(SEPARATOR).collect();
    if parts.len() != 2 {
        return Err(malformed());
    }

    let source_prefix = parts[0].trim();
    if source_prefix.is_empty() {
        return Err(malformed());
    }

    let target = parts[1].trim();
    let (target_host, target_port) = match target.split_once(':') {
        Some((host, port)) => (host.trim(), parse_port(raw, port.trim())?),
        None => (target, DEFAULT_PORT),
    };

    if target_host.is_empty() {
        return Err(malformed());
    }

    Ok(DomainRule {
        source_prefix: source_prefix.to_string(),
        target_host: target_host.to_string(),
        target_port,
    })
}

fn parse_port(rule: &str, port: &str) -> Result<u16, ParseError> {
    if port.is_empty() {
        return Ok(DEFAULT_PORT);
    }

    let invalid = || ParseError::InvalidPort {
        rule: rule.to_string(),
        port: port.to_string(),
    };

    // u16 bounds the upper end; zero is not a usable port.
    match port.parse::<u16>() {
        Ok(0) => Err(invalid()),
        Ok(value) => Ok(value),
        Err(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_port() {
        let rule = parse("/api -> backend1:8080").unwrap();
        assert_eq!(rule.source_prefix, "/api");
        assert_eq!(rule.target_host, "backend1");
        assert_eq!(rule.target_port, 8080);
    }

    #[test]
    fn test_parse_defaults_port() {
        let rule = parse("/ -> backend2").unwrap();
        assert_eq!(rule.source_prefix, "/");
        assert_eq!(rule.target_host, "backend2");
        assert_eq!(rule.target_port, 80);
    }

    #[test]
    fn test_parse_empty_port_defaults() {
        let rule = parse("/static -> assets:").unwrap();
        assert_eq!(rule.target_host, "assets");
        assert_eq!(rule.target_port, 80);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let rule = parse("  /api  ->  backend1 : 8080 ").unwrap();
        assert_eq!(rule.source_prefix, "/api");
        assert_eq!(rule.target_host, "backend1");
        assert_eq!(rule.target_port, 8080);
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(
            parse("/api -> backend1:8080").unwrap(),
            parse("/api -> backend1:8080").unwrap()
        );
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        assert!(matches!(
            parse("/api backend1:8080"),
            Err(ParseError::MalformedRule { .. })
        ));
    }

    #[test]
    fn test_double_separator_is_malformed() {
        assert!(matches!(
            parse("/api -> b1 -> b2"),
            Err(ParseError::MalformedRule { .. })
        ));
    }

    #[test]
    fn test_empty_prefix_is_malformed() {
        assert!(matches!(
            parse(" -> backend1:8080"),
            Err(ParseError::MalformedRule { .. })
        ));
    }

    #[test]
    fn test_empty_host_is_malformed() {
        assert!(matches!(
            parse("/bad -> "),
            Err(ParseError::MalformedRule { .. })
        ));
        assert!(matches!(
            parse("/bad -> :8080"),
            Err(ParseError::MalformedRule { .. })
        ));
    }

    #[test]
    fn test_invalid_port_values() {
        assert!(matches!(
            parse("/api -> backend1:http"),
            Err(ParseError::InvalidPort { .. })
        ));
        assert!(matches!(
            parse("/api -> backend1:0"),
            Err(ParseError::InvalidPort { .. })
        ));
        assert!(matches!(
            parse("/api -> backend1:70000"),
            Err(ParseError::InvalidPort { .. })
        ));
    }

    #[test]
    fn test_port_bounds() {
        assert_eq!(parse("/a -> h:1").unwrap().target_port, 1);
        assert_eq!(parse("/a -> h:65535").unwrap().target_port, 65535);
    }
}
