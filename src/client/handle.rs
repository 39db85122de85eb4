//! Opaque client handle for a search backend
//!
//! A handle is built once from connection settings, resolving every
//! configured endpoint up front, and is then shared by reference across
//! threads. It carries no liveness check: once the owning node or transport
//! is closed the handle silently goes stale, and not using it afterwards is
//! the caller's responsibility.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::client::connection::{Connection, DEFAULT_CONNECT_TIMEOUT};
use crate::config::{AuthConfig, ConnectionSettings, Endpoint, TransportTuning};
use crate::utils::ConnectionError;

/// One resolved transport address
#[derive(Debug, Clone)]
pub struct TransportAddress {
    pub endpoint: Endpoint,
    pub addr: SocketAddr,
}

#[derive(Debug)]
struct HandleInner {
    settings: ConnectionSettings,
    addresses: Vec<TransportAddress>,
}

/// Shared, opaque reference to a configured search backend
#[derive(Debug, Clone)]
pub struct ClientHandle {
    inner: Arc<HandleInner>,
}

impl ClientHandle {
    /// Build a handle, resolving every configured endpoint
    ///
    /// No connectivity probe is performed, but each host must resolve; a
    /// hostname that cannot be resolved is a fatal construction failure.
    /// Zero endpoints is valid and yields an inert handle.
    pub fn build(settings: ConnectionSettings) -> Result<Self, ConnectionError> {
        let mut addresses = Vec::with_capacity(settings.endpoints.len());
        for endpoint in &settings.endpoints {
            addresses.push(TransportAddress {
                endpoint: endpoint.clone(),
                addr: resolve(endpoint)?,
            });
        }

        Ok(Self {
            inner: Arc::new(HandleInner {
                settings,
                addresses,
            }),
        })
    }

    /// Resolved transport addresses, in configuration order
    pub fn transport_addresses(&self) -> &[TransportAddress] {
        &self.inner.addresses
    }

    /// Credentials the handle was built with
    pub fn auth(&self) -> &AuthConfig {
        &self.inner.settings.auth
    }

    /// Transport-tuning flags the handle was built with
    pub fn tuning(&self) -> TransportTuning {
        self.inner.settings.tuning
    }

    /// Whether the handle has no reachable members configured
    pub fn is_inert(&self) -> bool {
        self.inner.addresses.is_empty()
    }

    /// Open an authenticated connection to the first transport address
    pub fn connect(&self) -> Result<Connection, ConnectionError> {
        let first = self
            .inner
            .addresses
            .first()
            .ok_or(ConnectionError::NoAddresses)?;

        let mut conn = Connection::connect_tcp(
            &first.endpoint.host,
            first.endpoint.port,
            DEFAULT_CONNECT_TIMEOUT,
        )?;
        conn.authenticate(&self.inner.settings.auth)?;
        Ok(conn)
    }
}

fn resolve(endpoint: &Endpoint) -> Result<SocketAddr, ConnectionError> {
    use std::net::ToSocketAddrs;

    (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()
        .map_err(|e| ConnectionError::ResolveFailed {
            host: endpoint.host.clone(),
            port: endpoint.port,
            source: e,
        })?
        .next()
        .ok_or_else(|| ConnectionError::ResolveFailed {
            host: endpoint.host.clone(),
            port: endpoint.port,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No addresses found"),
        })
}
