//! Error types for searchlink

use std::io;
use thiserror::Error;

/// Top-level backend wiring error
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid endpoint '{token}': expected host or host:port")]
    InvalidEndpoint { token: String },
}

/// Connection-related errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to resolve {host}:{port}: {source}")]
    ResolveFailed {
        host: String,
        port: u16,
        source: io::Error,
    },

    #[error("Failed to connect to {host}:{port}: {source}")]
    ConnectFailed {
        host: String,
        port: u16,
        source: io::Error,
    },

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Client handle has no transport addresses")]
    NoAddresses,
}

/// Embedded node lifecycle errors
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Plugin set does not include a network transport plugin")]
    MissingTransportPlugin,

    #[error("Node bootstrap failed: {source}")]
    Bootstrap { source: io::Error },

    #[error("Node shutdown failed: {source}")]
    Shutdown { source: io::Error },
}

/// Convenience result type used throughout the crate
pub type Result<T> = std::result::Result<T, BackendError>;
