//! Client connection layer

pub mod connection;
pub mod external;
pub mod handle;

pub use connection::{Connection, DEFAULT_CONNECT_TIMEOUT};
pub use external::{ExternalClientProvider, ADDRESS_LIST_KEY, CREDENTIALS_KEY};
pub use handle::{ClientHandle, TransportAddress};
