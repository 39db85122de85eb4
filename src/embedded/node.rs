//! In-process search backend node
//!
//! A node owns one TCP transport listener and a serve thread answering the
//! wire protocol (PING, AUTH, INFO). Construction requires the network
//! transport plugin in the plugin set; without it no remote or local TCP
//! access is possible. Closing is idempotent: the first close signals the
//! serve thread, wakes the accept loop and joins it, later closes are
//! no-ops.

use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::ClientHandle;
use crate::config::{AuthConfig, ConnectionSettings, Endpoint, TransportTuning};
use crate::utils::{ConnectionError, NodeError, WireDecoder, WireEncoder, WireValue};

/// Plugins an embedded node can be constructed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plugin {
    /// Network transport over TCP; required for any remote or local access
    TcpTransport,
}

impl Plugin {
    pub fn name(&self) -> &'static str {
        match self {
            Plugin::TcpTransport => "transport-tcp",
        }
    }
}

/// The fixed plugin set used for embedded nodes
pub const DEFAULT_PLUGINS: &[Plugin] = &[Plugin::TcpTransport];

/// Transport wire protocol selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportType {
    Tcp,
}

/// Node settings, built fresh on every start attempt
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub cluster_name: String,
    pub bind_host: String,
    pub bind_port: u16,
    pub data_dir: PathBuf,
    pub home_dir: PathBuf,
    pub plugins: Vec<Plugin>,
    pub transport_type: TransportType,
}

/// Name of the metadata document written into the node's home directory
pub const NODE_METADATA_FILE: &str = "node.meta.json";

/// Metadata document describing a started node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub cluster_name: String,
    pub transport_port: u16,
    pub started_at_ms: u64,
    pub plugins: Vec<String>,
}

/// A live embedded node
pub struct Node {
    config: NodeConfig,
    bound_port: u16,
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    closed: AtomicBool,
    serve_thread: Option<JoinHandle<()>>,
}

impl Node {
    /// Construct and start a node from the given settings
    ///
    /// Binds the transport listener and spawns the serve thread. Bind
    /// failures are fatal and propagated; writing the metadata document is
    /// best effort.
    pub fn start(config: NodeConfig) -> Result<Self, NodeError> {
        if !config.plugins.contains(&Plugin::TcpTransport) {
            return Err(NodeError::MissingTransportPlugin);
        }

        info!("Starting embedded node for cluster {}", config.cluster_name);

        let listener = TcpListener::bind((config.bind_host.as_str(), config.bind_port))
            .map_err(|source| NodeError::Bootstrap { source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| NodeError::Bootstrap { source })?;
        let bound_port = local_addr.port();

        write_metadata(&config, bound_port);

        let shutdown = Arc::new(AtomicBool::new(false));
        let serve_thread = {
            let shutdown = Arc::clone(&shutdown);
            let cluster_name = config.cluster_name.clone();
            thread::spawn(move || serve(listener, shutdown, cluster_name, bound_port))
        };

        info!(
            "Embedded node for cluster {} started in local mode on port {}",
            config.cluster_name, bound_port
        );

        Ok(Self {
            config,
            bound_port,
            local_addr,
            shutdown,
            closed: AtomicBool::new(false),
            serve_thread: Some(serve_thread),
        })
    }

    /// The settings this node was started with
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The port the transport actually bound (differs from the configured
    /// port when that was 0)
    pub fn bound_port(&self) -> u16 {
        self.bound_port
    }

    /// Client handle for this node's transport, at the loopback address
    pub fn client(&self) -> Result<ClientHandle, ConnectionError> {
        let settings = ConnectionSettings {
            endpoints: vec![Endpoint::new("127.0.0.1", self.bound_port)],
            auth: AuthConfig::default(),
            tuning: TransportTuning::local(),
        };
        ClientHandle::build(settings)
    }

    /// Shut the node down
    ///
    /// Idempotent: only the first call closes the transport and joins the
    /// serve thread.
    pub fn close(&mut self) -> Result<(), NodeError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.shutdown.store(true, Ordering::SeqCst);
        // Wake the accept loop so it observes the shutdown flag
        let _ = TcpStream::connect(("127.0.0.1", self.bound_port));
        let _ = TcpStream::connect(self.local_addr);

        if let Some(handle) = self.serve_thread.take() {
            if handle.join().is_err() {
                return Err(NodeError::Shutdown {
                    source: io::Error::other("serve thread panicked"),
                });
            }
        }

        Ok(())
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Error closing embedded node: {}", e);
        }
    }
}

fn write_metadata(config: &NodeConfig, bound_port: u16) {
    let metadata = NodeMetadata {
        cluster_name: config.cluster_name.clone(),
        transport_port: bound_port,
        started_at_ms: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64,
        plugins: config.plugins.iter().map(|p| p.name().to_string()).collect(),
    };

    let result = serde_json::to_string_pretty(&metadata)
        .map_err(io::Error::other)
        .and_then(|json| fs::write(config.home_dir.join(NODE_METADATA_FILE), json));
    if let Err(e) = result {
        warn!("Failed to write node metadata: {}", e);
    }
}

fn serve(listener: TcpListener, shutdown: Arc<AtomicBool>, cluster_name: String, port: u16) {
    for incoming in listener.incoming() {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        match incoming {
            Ok(stream) => {
                let shutdown = Arc::clone(&shutdown);
                let cluster_name = cluster_name.clone();
                thread::spawn(move || {
                    if let Err(e) = handle_connection(stream, shutdown, cluster_name, port) {
                        debug!("Transport connection ended: {}", e);
                    }
                });
            }
            Err(e) => {
                if shutdown.load(Ordering::SeqCst) {
                    break;
                }
                warn!("Transport accept failed: {}", e);
            }
        }
    }
}

fn handle_connection(
    stream: TcpStream,
    shutdown: Arc<AtomicBool>,
    cluster_name: String,
    port: u16,
) -> io::Result<()> {
    let reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);
    let mut decoder = WireDecoder::new(reader);
    let mut encoder = WireEncoder::with_capacity(256);

    loop {
        if shutdown.load(Ordering::SeqCst) {
            return Ok(());
        }

        let request = match decoder.decode() {
            Ok(value) => value,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e),
        };

        let reply = dispatch(&request, &cluster_name, port);
        encoder.clear();
        encoder.encode_value(&reply);
        writer.write_all(encoder.as_bytes())?;
        writer.flush()?;
    }
}

fn dispatch(request: &WireValue, cluster_name: &str, port: u16) -> WireValue {
    let args: Vec<&str> = match request.as_array() {
        Some(items) => items.iter().filter_map(|v| v.as_str()).collect(),
        None => Vec::new(),
    };

    let Some(command) = args.first() else {
        return WireValue::Error("ERR empty command".to_string());
    };

    match command.to_ascii_uppercase().as_str() {
        "PING" => WireValue::SimpleString("PONG".to_string()),
        // Credential verification is the backend's concern, not the
        // transport's
        "AUTH" => WireValue::SimpleString("OK".to_string()),
        "INFO" => {
            let plugins = DEFAULT_PLUGINS
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(",");
            WireValue::BulkString(
                format!(
                    "cluster_name:{}\r\ntransport_port:{}\r\nplugins:{}\r\n",
                    cluster_name, port, plugins
                )
                .into_bytes(),
            )
        }
        other => WireValue::Error(format!("ERR unknown command '{}'", other)),
    }
}
