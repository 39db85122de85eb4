//! searchlink library
//!
//! Search backend wiring for workflow task indexing. The indexing subsystem
//! gets its client handle from one of two places: an externally running
//! cluster reached through a configured address list, or an embedded node
//! bootstrapped and supervised inside the host process (standalone and test
//! deployments).

pub mod client;
pub mod config;
pub mod embedded;
pub mod utils;

pub use client::{ClientHandle, Connection, ExternalClientProvider, TransportAddress};
pub use config::{
    parse_address_list, AuthConfig, ConnectionSettings, Endpoint, Properties, TransportTuning,
};
pub use embedded::{CleanOutcome, EmbeddedNodeManager, Node, NodeConfig, Plugin};
pub use utils::{BackendError, ConfigError, ConnectionError, NodeError, Result};
