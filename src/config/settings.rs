//! Connection settings for search backend clients

use crate::config::address::Endpoint;

/// Username assumed when no credentials are configured
pub const DEFAULT_USERNAME: &str = "elastic";

/// Password assumed when no credentials are configured
pub const DEFAULT_PASSWORD: &str = "changeme";

/// Authentication credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl AuthConfig {
    /// Parse a `user:password` pair
    ///
    /// A value without a `:` is taken as a bare username with an empty
    /// password.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((username, password)) => Self {
                username: username.to_string(),
                password: password.to_string(),
            },
            None => Self {
                username: raw.to_string(),
                password: String::new(),
            },
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

/// Transport-tuning flags for a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportTuning {
    /// Do not require the target cluster name to match
    pub ignore_cluster_name: bool,
    /// Auto-discover cluster members beyond the configured endpoints
    pub sniff: bool,
}

impl TransportTuning {
    /// Tuning used by the locally built client: cluster-name matching
    /// relaxed, sniffing enabled.
    pub fn local() -> Self {
        Self {
            ignore_cluster_name: true,
            sniff: true,
        }
    }
}

impl Default for TransportTuning {
    fn default() -> Self {
        Self {
            ignore_cluster_name: false,
            sniff: false,
        }
    }
}

/// Complete settings for one client handle
///
/// Built once per client construction; not persisted.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub endpoints: Vec<Endpoint>,
    pub auth: AuthConfig,
    pub tuning: TransportTuning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credential_pair() {
        let auth = AuthConfig::parse("admin:secret");
        assert_eq!(auth.username, "admin");
        assert_eq!(auth.password, "secret");
    }

    #[test]
    fn test_parse_bare_username() {
        let auth = AuthConfig::parse("admin");
        assert_eq!(auth.username, "admin");
        assert_eq!(auth.password, "");
    }

    #[test]
    fn test_default_credentials() {
        let auth = AuthConfig::default();
        assert_eq!(auth.username, "elastic");
        assert_eq!(auth.password, "changeme");
    }

    #[test]
    fn test_local_tuning() {
        let tuning = TransportTuning::local();
        assert!(tuning.ignore_cluster_name);
        assert!(tuning.sniff);
    }
}
