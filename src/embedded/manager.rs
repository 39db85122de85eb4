//! Embedded node lifecycle manager
//!
//! One manager value owns at most one live node. `start` and `stop` are
//! serialized through the slot mutex, so no two transitions are in flight
//! at once and no two nodes can be live simultaneously. `start` blocks the
//! calling thread until the node finishes bootstrap or fails; there is no
//! timeout. Dropping the manager performs the equivalent of `stop` exactly
//! once, so a node cannot outlive the value that started it.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{error, info};

use crate::client::ClientHandle;
use crate::config::DEFAULT_PORT;
use crate::embedded::datadir::NodePaths;
use crate::embedded::node::{Node, NodeConfig, TransportType, DEFAULT_PLUGINS};
use crate::utils::Result;

/// Cluster name used by `start_default`
pub const DEFAULT_CLUSTER_NAME: &str = "elasticsearch_test";

/// Bind host used by `start_default` and for loopback-only nodes
pub const DEFAULT_HOST: &str = "127.0.0.1";

enum NodeSlot {
    Stopped,
    Running { node: Node, client: ClientHandle },
}

/// Lifecycle manager for the embedded node
///
/// Owned by the application's composition root and shared by reference.
pub struct EmbeddedNodeManager {
    slot: Mutex<NodeSlot>,
}

impl EmbeddedNodeManager {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(NodeSlot::Stopped),
        }
    }

    /// Start the embedded node
    ///
    /// A no-op when the node is already running. Provisions fresh data and
    /// home directories for this attempt (best-effort clean and create),
    /// then constructs and starts the node with the fixed plugin set.
    /// Bootstrap failures propagate and leave the manager stopped.
    ///
    /// When `enable_external_access` is false the transport binds the
    /// loopback address regardless of `host`.
    pub fn start(
        &self,
        cluster_name: &str,
        host: &str,
        port: u16,
        enable_external_access: bool,
    ) -> Result<()> {
        let mut slot = self.slot.lock().unwrap();

        if let NodeSlot::Running { node, .. } = &*slot {
            info!(
                "Embedded node is already running on port {}",
                node.bound_port()
            );
            return Ok(());
        }

        let paths = NodePaths::provision(cluster_name);
        paths.setup();

        let bind_host = if enable_external_access {
            host.to_string()
        } else {
            DEFAULT_HOST.to_string()
        };

        let config = NodeConfig {
            cluster_name: cluster_name.to_string(),
            bind_host,
            bind_port: port,
            data_dir: paths.data_dir,
            home_dir: paths.home_dir,
            plugins: DEFAULT_PLUGINS.to_vec(),
            transport_type: TransportType::Tcp,
        };

        let node = Node::start(config)?;
        let client = node.client()?;
        *slot = NodeSlot::Running { node, client };
        Ok(())
    }

    /// Start with the stock settings: cluster `elasticsearch_test`, bound
    /// to 127.0.0.1:9200, external access enabled
    pub fn start_default(&self) -> Result<()> {
        self.start(DEFAULT_CLUSTER_NAME, DEFAULT_HOST, DEFAULT_PORT, true)
    }

    /// Stop the embedded node
    ///
    /// A no-op when already stopped. Close failures are logged and
    /// swallowed; the manager always ends up stopped.
    pub fn stop(&self) {
        // The shutdown path must complete even if a lock holder panicked
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let NodeSlot::Running { mut node, .. } = std::mem::replace(&mut *slot, NodeSlot::Stopped)
        {
            let port = node.bound_port();
            info!("Stopping embedded node");
            if let Err(e) = node.close() {
                error!("Error closing embedded node: {}", e);
            }
            info!("Embedded node on port {} stopped", port);
        }
    }

    /// Client handle for the running node, if any
    ///
    /// Returns `None` (with an error log) when the node is not running;
    /// never fails. A returned handle goes stale if `stop` is called later;
    /// not using it past that point is the caller's responsibility.
    pub fn get_client(&self) -> Option<ClientHandle> {
        let slot = self.slot.lock().unwrap();
        match &*slot {
            NodeSlot::Running { client, .. } => Some(client.clone()),
            NodeSlot::Stopped => {
                error!("Embedded node is not initialized and started, call start() first");
                None
            }
        }
    }

    /// Whether a node is currently live
    pub fn is_running(&self) -> bool {
        matches!(&*self.slot.lock().unwrap(), NodeSlot::Running { .. })
    }

    /// Port the running node's transport bound, if any
    pub fn bound_port(&self) -> Option<u16> {
        match &*self.slot.lock().unwrap() {
            NodeSlot::Running { node, .. } => Some(node.bound_port()),
            NodeSlot::Stopped => None,
        }
    }

    /// Data directory of the running node, if any
    ///
    /// Harness resets pair this with `embedded::clean_dir`.
    pub fn data_dir(&self) -> Option<PathBuf> {
        match &*self.slot.lock().unwrap() {
            NodeSlot::Running { node, .. } => Some(node.config().data_dir.clone()),
            NodeSlot::Stopped => None,
        }
    }
}

impl Default for EmbeddedNodeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EmbeddedNodeManager {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedded::datadir::{clean_dir, CleanOutcome};
    use std::fs;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_get_client_before_start_is_absent() {
        let manager = EmbeddedNodeManager::new();
        assert!(manager.get_client().is_none());
    }

    #[test]
    fn test_start_is_idempotent() {
        let manager = EmbeddedNodeManager::new();
        manager.start("idempotent_test", "127.0.0.1", 0, false).unwrap();

        let port = manager.bound_port().unwrap();
        let data_dir = manager.data_dir().unwrap();

        // Second start must not re-provision or rebind
        manager.start("idempotent_test", "127.0.0.1", 0, false).unwrap();
        assert_eq!(manager.bound_port(), Some(port));
        assert_eq!(manager.data_dir(), Some(data_dir));

        manager.stop();
    }

    #[test]
    fn test_client_answers_ping() {
        let manager = EmbeddedNodeManager::new();
        manager.start("ping_test", "127.0.0.1", 0, false).unwrap();

        let handle = manager.get_client().unwrap();
        let mut conn = handle.connect().unwrap();
        assert!(conn.ping().unwrap());

        manager.stop();
        assert!(manager.get_client().is_none());
    }

    #[test]
    fn test_stop_when_stopped_is_a_noop() {
        let manager = EmbeddedNodeManager::new();
        manager.stop();
        manager.stop();
        assert!(!manager.is_running());
    }

    #[test]
    fn test_restart_uses_fresh_empty_data_dir() {
        let manager = EmbeddedNodeManager::new();
        manager.start("restart_test", "127.0.0.1", 0, false).unwrap();

        let first_dir = manager.data_dir().unwrap();
        fs::write(first_dir.join("stale.bin"), b"junk").unwrap();
        manager.stop();

        // Directories survive stop; only the next start cleans its own
        assert!(first_dir.join("stale.bin").exists());

        manager.start("restart_test", "127.0.0.1", 0, false).unwrap();
        let second_dir = manager.data_dir().unwrap();
        assert_ne!(second_dir, first_dir);
        assert_eq!(fs::read_dir(&second_dir).unwrap().count(), 0);

        manager.stop();
        let _ = fs::remove_dir_all(first_dir);
        let _ = fs::remove_dir_all(second_dir);
    }

    #[test]
    fn test_clean_data_dir_on_missing_path() {
        let missing = std::env::temp_dir().join("searchlink-never-created");
        assert_eq!(clean_dir(&missing), CleanOutcome::AlreadyAbsent);
    }

    #[test]
    fn test_concurrent_start_stop_serializes() {
        let manager = Arc::new(EmbeddedNodeManager::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let manager = Arc::clone(&manager);
            handles.push(thread::spawn(move || {
                for _ in 0..4 {
                    if i % 2 == 0 {
                        manager
                            .start("concurrent_test", "127.0.0.1", 0, false)
                            .unwrap();
                    } else {
                        manager.stop();
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // Whatever interleaving happened, the manager is in a coherent
        // state and a final stop leaves it stopped
        manager.stop();
        assert!(!manager.is_running());
        assert!(manager.get_client().is_none());
    }

    #[test]
    fn test_drop_stops_running_node() {
        let port;
        {
            let manager = EmbeddedNodeManager::new();
            manager.start("drop_test", "127.0.0.1", 0, false).unwrap();
            port = manager.bound_port().unwrap();
        }

        use crate::client::{Connection, DEFAULT_CONNECT_TIMEOUT};
        assert!(Connection::connect_tcp("127.0.0.1", port, DEFAULT_CONNECT_TIMEOUT).is_err());
    }

    #[test]
    fn test_explicit_stop_then_drop_is_safe() {
        let manager = EmbeddedNodeManager::new();
        manager.start("double_stop_test", "127.0.0.1", 0, false).unwrap();
        manager.stop();
        drop(manager);
    }
}
