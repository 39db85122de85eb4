//! Utility modules

pub mod error;
pub mod wire;

pub use error::{BackendError, ConfigError, ConnectionError, NodeError, Result};
pub use wire::{WireDecoder, WireEncoder, WireValue};
