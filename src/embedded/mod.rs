//! Embedded node lifecycle
//!
//! Bootstraps and supervises a search backend node inside the host process,
//! for standalone and test deployments.

pub mod datadir;
pub mod manager;
pub mod node;

pub use datadir::{clean_dir, create_dir, CleanOutcome, NodePaths};
pub use manager::{EmbeddedNodeManager, DEFAULT_CLUSTER_NAME, DEFAULT_HOST};
pub use node::{
    Node, NodeConfig, NodeMetadata, Plugin, TransportType, DEFAULT_PLUGINS, NODE_METADATA_FILE,
};
