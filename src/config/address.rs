//! Search cluster address list parsing
//!
//! The cluster address list is a comma-separated sequence of `host` or
//! `host:port` tokens. Parsing is purely syntactic: no uniqueness or
//! reachability checks are applied here.

use std::fmt;

use crate::utils::ConfigError;

/// Port assumed when a token carries no explicit one
pub const DEFAULT_PORT: u16 = 9200;

/// One member of a search cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parse a comma-separated address list into endpoints
///
/// An empty or blank input yields an empty list; callers treat that as
/// "backend disabled", not as an error. A malformed token (non-numeric port,
/// more than one `:`) is a configuration error surfaced to the caller.
pub fn parse_address_list(raw: &str) -> Result<Vec<Endpoint>, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',').map(parse_endpoint).collect()
}

fn parse_endpoint(token: &str) -> Result<Endpoint, ConfigError> {
    let token = token.trim();
    let parts: Vec<&str> = token.split(':').collect();

    match parts.as_slice() {
        [host] if !host.is_empty() => Ok(Endpoint::new(*host, DEFAULT_PORT)),
        [host, port] if !host.is_empty() => match port.parse::<u16>() {
            Ok(port) => Ok(Endpoint::new(*host, port)),
            Err(_) => Err(ConfigError::InvalidEndpoint {
                token: token.to_string(),
            }),
        },
        _ => Err(ConfigError::InvalidEndpoint {
            token: token.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_list() {
        let endpoints = parse_address_list("a:1,b:2,c").unwrap();
        assert_eq!(
            endpoints,
            vec![
                Endpoint::new("a", 1),
                Endpoint::new("b", 2),
                Endpoint::new("c", DEFAULT_PORT),
            ]
        );
    }

    #[test]
    fn test_parse_empty_is_disabled() {
        assert!(parse_address_list("").unwrap().is_empty());
        assert!(parse_address_list("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_default_port() {
        let endpoints = parse_address_list("search.example.com").unwrap();
        assert_eq!(endpoints, vec![Endpoint::new("search.example.com", 9200)]);
    }

    #[test]
    fn test_parse_too_many_parts() {
        let err = parse_address_list("bad:port:x").unwrap_err();
        match err {
            ConfigError::InvalidEndpoint { token } => assert_eq!(token, "bad:port:x"),
        }
    }

    #[test]
    fn test_parse_non_numeric_port() {
        assert!(parse_address_list("a:xyz").is_err());
    }

    #[test]
    fn test_parse_blank_token_is_malformed() {
        assert!(parse_address_list("a:1,,b:2").is_err());
    }

    #[test]
    fn test_endpoint_display() {
        assert_eq!(Endpoint::new("127.0.0.1", 9200).to_string(), "127.0.0.1:9200");
    }
}
