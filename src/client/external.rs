//! Client provider for an externally running search cluster
//!
//! Builds the transport client handle from two configuration values: the
//! cluster address list and the credential pair. An unset address list
//! leaves indexing disabled rather than failing; an unset credential pair
//! falls back to the stock defaults. Both fallbacks are warned about.

use std::sync::OnceLock;

use tracing::warn;

use crate::client::handle::ClientHandle;
use crate::config::{
    parse_address_list, AuthConfig, ConnectionSettings, Properties, TransportTuning,
};
use crate::utils::Result;

/// Configuration key holding the comma-separated cluster address list
pub const ADDRESS_LIST_KEY: &str = "workflow.elasticsearch.url";

/// Configuration key holding the `user:password` credential pair
pub const CREDENTIALS_KEY: &str = "workflow.elasticsearch.user";

/// Provider for the external cluster client
///
/// The first successfully built handle is cached; later calls return the
/// cached handle regardless of configuration drift. One provider value is
/// meant to live at the application's composition root.
#[derive(Debug, Default)]
pub struct ExternalClientProvider {
    client: OnceLock<ClientHandle>,
}

impl ExternalClientProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the client handle, building it on first call
    ///
    /// Fatal failures are a malformed address token and an unresolvable
    /// hostname; everything else degrades with a warning.
    pub fn get_client(&self, props: &Properties) -> Result<ClientHandle> {
        if let Some(handle) = self.client.get() {
            return Ok(handle.clone());
        }

        let handle = Self::build_client(props)?;
        Ok(self.client.get_or_init(|| handle).clone())
    }

    fn build_client(props: &Properties) -> Result<ClientHandle> {
        let cluster_address = props.get_or(ADDRESS_LIST_KEY, "");
        if cluster_address.is_empty() {
            warn!(
                "{} is not set. Indexing will remain DISABLED.",
                ADDRESS_LIST_KEY
            );
        }
        let endpoints = parse_address_list(cluster_address)?;

        let auth = match props.get(CREDENTIALS_KEY) {
            Some(raw) => AuthConfig::parse(raw),
            None => {
                let auth = AuthConfig::default();
                warn!(
                    "{} is not set. Will try using default values: {}:{}",
                    CREDENTIALS_KEY, auth.username, auth.password
                );
                auth
            }
        };

        let settings = ConnectionSettings {
            endpoints,
            auth,
            tuning: TransportTuning::local(),
        };

        Ok(ClientHandle::build(settings)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{BackendError, ConfigError, ConnectionError};

    #[test]
    fn test_default_credentials_when_unset() {
        let mut props = Properties::new();
        props.set(ADDRESS_LIST_KEY, "127.0.0.1:9200");

        let provider = ExternalClientProvider::new();
        let handle = provider.get_client(&props).unwrap();

        assert_eq!(handle.auth().username, "elastic");
        assert_eq!(handle.auth().password, "changeme");
        assert_eq!(handle.transport_addresses().len(), 1);
    }

    #[test]
    fn test_missing_address_list_yields_inert_handle() {
        let provider = ExternalClientProvider::new();
        let handle = provider.get_client(&Properties::new()).unwrap();
        assert!(handle.is_inert());
    }

    #[test]
    fn test_local_client_tuning() {
        let mut props = Properties::new();
        props.set(ADDRESS_LIST_KEY, "127.0.0.1:9200");

        let provider = ExternalClientProvider::new();
        let handle = provider.get_client(&props).unwrap();
        assert!(handle.tuning().ignore_cluster_name);
        assert!(handle.tuning().sniff);
    }

    #[test]
    fn test_malformed_token_propagates() {
        let mut props = Properties::new();
        props.set(ADDRESS_LIST_KEY, "bad:port:x");

        let provider = ExternalClientProvider::new();
        let err = provider.get_client(&props).unwrap_err();
        assert!(matches!(
            err,
            BackendError::Config(ConfigError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_unresolvable_host_propagates() {
        let mut props = Properties::new();
        props.set(ADDRESS_LIST_KEY, "no-such-host.invalid:9200");

        let provider = ExternalClientProvider::new();
        let err = provider.get_client(&props).unwrap_err();
        assert!(matches!(
            err,
            BackendError::Connection(ConnectionError::ResolveFailed { .. })
        ));
    }

    #[test]
    fn test_first_handle_is_cached() {
        let mut props = Properties::new();
        props.set(ADDRESS_LIST_KEY, "127.0.0.1:9200");

        let provider = ExternalClientProvider::new();
        let first = provider.get_client(&props).unwrap();

        let mut drifted = Properties::new();
        drifted.set(ADDRESS_LIST_KEY, "127.0.0.1:9300,127.0.0.1:9400");
        let second = provider.get_client(&drifted).unwrap();

        assert_eq!(second.transport_addresses().len(), 1);
        assert_eq!(
            second.transport_addresses()[0].addr,
            first.transport_addresses()[0].addr
        );
    }
}
