//! Blocking TCP connection to a search backend transport
//!
//! Buffered reader/writer halves are split off the same stream so command
//! writes and reply reads do not contend on one buffer.

use std::io::{self, BufReader, BufWriter, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::config::AuthConfig;
use crate::utils::{ConnectionError, WireDecoder, WireEncoder, WireValue};

/// Default timeout for establishing a transport connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A live transport connection
pub struct Connection {
    writer: BufWriter<TcpStream>,
    reader: BufReader<TcpStream>,
}

impl Connection {
    /// Open a TCP connection to the given host and port
    pub fn connect_tcp(
        host: &str,
        port: u16,
        connect_timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        use std::net::ToSocketAddrs;

        let addr_str = format!("{}:{}", host, port);

        // Resolve hostname to socket address
        let addr = addr_str
            .to_socket_addrs()
            .map_err(|e| ConnectionError::ResolveFailed {
                host: host.to_string(),
                port,
                source: e,
            })?
            .next()
            .ok_or_else(|| ConnectionError::ResolveFailed {
                host: host.to_string(),
                port,
                source: io::Error::new(io::ErrorKind::NotFound, "No addresses found"),
            })?;

        let stream = TcpStream::connect_timeout(&addr, connect_timeout).map_err(|e| {
            ConnectionError::ConnectFailed {
                host: host.to_string(),
                port,
                source: e,
            }
        })?;

        // Configure socket
        stream.set_nodelay(true).ok();
        stream.set_read_timeout(Some(Duration::from_secs(30))).ok();
        stream.set_write_timeout(Some(Duration::from_secs(30))).ok();

        let writer = BufWriter::with_capacity(
            8192,
            stream
                .try_clone()
                .map_err(|e| ConnectionError::ConnectFailed {
                    host: host.to_string(),
                    port,
                    source: e,
                })?,
        );
        let reader = BufReader::with_capacity(8192, stream);

        Ok(Self { writer, reader })
    }

    /// Read a single reply
    fn read_response(&mut self) -> io::Result<WireValue> {
        let mut decoder = WireDecoder::new(&mut self.reader);
        decoder.decode()
    }

    /// Send a command and receive its reply
    pub fn execute(&mut self, args: &[&str]) -> io::Result<WireValue> {
        let mut encoder = WireEncoder::with_capacity(256);
        encoder.encode_command_str(args);
        self.writer.write_all(encoder.as_bytes())?;
        self.writer.flush()?;
        self.read_response()
    }

    /// Send AUTH with the given credentials
    pub fn authenticate(&mut self, auth: &AuthConfig) -> Result<(), ConnectionError> {
        let response = self
            .execute(&["AUTH", &auth.username, &auth.password])
            .map_err(|e| ConnectionError::AuthFailed(format!("IO error: {}", e)))?;

        match response {
            WireValue::SimpleString(s) if s == "OK" => Ok(()),
            WireValue::Error(e) => Err(ConnectionError::AuthFailed(e)),
            other => Err(ConnectionError::AuthFailed(format!(
                "Unexpected response: {:?}",
                other
            ))),
        }
    }

    /// Send PING, expect PONG
    pub fn ping(&mut self) -> io::Result<bool> {
        let response = self.execute(&["PING"])?;
        match response {
            WireValue::SimpleString(s) => Ok(s == "PONG"),
            _ => Ok(false),
        }
    }

    /// Fetch the node description via INFO
    pub fn info(&mut self) -> io::Result<String> {
        let response = self.execute(&["INFO"])?;
        match response {
            WireValue::BulkString(data) => String::from_utf8(data).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
            }),
            WireValue::Error(e) => Err(io::Error::other(e)),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unexpected INFO response: {:?}", other),
            )),
        }
    }
}
