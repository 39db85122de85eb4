//! Configuration module

pub mod address;
pub mod properties;
pub mod settings;

pub use address::{parse_address_list, Endpoint, DEFAULT_PORT};
pub use properties::Properties;
pub use settings::{
    AuthConfig, ConnectionSettings, TransportTuning, DEFAULT_PASSWORD, DEFAULT_USERNAME,
};
