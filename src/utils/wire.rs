//! Wire codec for the search backend transport
//!
//! This module provides buffer-reusing encoding for transport commands and
//! streaming decoding for responses. The same frame format is spoken on both
//! sides: the client layer encodes commands and decodes replies, the embedded
//! node decodes commands and encodes replies.

use std::io::{self, BufRead};

/// Wire value types
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// Simple string (+OK\r\n)
    SimpleString(String),
    /// Error (-ERR message\r\n)
    Error(String),
    /// Integer (:1000\r\n)
    Integer(i64),
    /// Bulk string ($6\r\nfoobar\r\n)
    BulkString(Vec<u8>),
    /// Null bulk string ($-1\r\n)
    Null,
    /// Array (*2\r\n...)
    Array(Vec<WireValue>),
}

impl WireValue {
    /// Check if this is an error reply
    pub fn is_error(&self) -> bool {
        matches!(self, WireValue::Error(_))
    }

    /// Get as string (for simple string or bulk string)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::SimpleString(s) => Some(s),
            WireValue::BulkString(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Get as bytes (for bulk string)
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            WireValue::BulkString(b) => Some(b),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            WireValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as array
    pub fn as_array(&self) -> Option<&[WireValue]> {
        match self {
            WireValue::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

/// Wire encoder with pre-allocated buffer
pub struct WireEncoder {
    buf: Vec<u8>,
}

impl WireEncoder {
    /// Create new encoder with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Clear buffer for reuse
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Get encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Encode a command as an array of bulk strings
    pub fn encode_command(&mut self, args: &[&[u8]]) {
        // Array header: *<count>\r\n
        self.buf.push(b'*');
        self.write_int(args.len() as i64);
        self.buf.extend_from_slice(b"\r\n");

        // Each argument as bulk string: $<len>\r\n<data>\r\n
        for arg in args {
            self.buf.push(b'$');
            self.write_int(arg.len() as i64);
            self.buf.extend_from_slice(b"\r\n");
            self.buf.extend_from_slice(arg);
            self.buf.extend_from_slice(b"\r\n");
        }
    }

    /// Encode a command from string slices
    pub fn encode_command_str(&mut self, args: &[&str]) {
        let byte_args: Vec<&[u8]> = args.iter().map(|s| s.as_bytes()).collect();
        self.encode_command(&byte_args);
    }

    /// Encode a reply value (used by the embedded node's transport)
    pub fn encode_value(&mut self, value: &WireValue) {
        match value {
            WireValue::SimpleString(s) => {
                self.buf.push(b'+');
                self.buf.extend_from_slice(s.as_bytes());
                self.buf.extend_from_slice(b"\r\n");
            }
            WireValue::Error(e) => {
                self.buf.push(b'-');
                self.buf.extend_from_slice(e.as_bytes());
                self.buf.extend_from_slice(b"\r\n");
            }
            WireValue::Integer(i) => {
                self.buf.push(b':');
                self.write_int(*i);
                self.buf.extend_from_slice(b"\r\n");
            }
            WireValue::BulkString(data) => {
                self.buf.push(b'$');
                self.write_int(data.len() as i64);
                self.buf.extend_from_slice(b"\r\n");
                self.buf.extend_from_slice(data);
                self.buf.extend_from_slice(b"\r\n");
            }
            WireValue::Null => {
                self.buf.extend_from_slice(b"$-1\r\n");
            }
            WireValue::Array(items) => {
                self.buf.push(b'*');
                self.write_int(items.len() as i64);
                self.buf.extend_from_slice(b"\r\n");
                for item in items {
                    self.encode_value(item);
                }
            }
        }
    }

    /// Write integer using fast itoa
    #[inline]
    fn write_int(&mut self, value: i64) {
        let mut buffer = itoa::Buffer::new();
        let s = buffer.format(value);
        self.buf.extend_from_slice(s.as_bytes());
    }
}

/// Wire decoder for streaming reads
pub struct WireDecoder<R> {
    reader: R,
    line_buf: String,
}

impl<R: BufRead> WireDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buf: String::with_capacity(256),
        }
    }

    /// Decode next wire value from stream
    pub fn decode(&mut self) -> io::Result<WireValue> {
        // Read type byte
        self.line_buf.clear();
        self.reader.read_line(&mut self.line_buf)?;

        if self.line_buf.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Connection closed",
            ));
        }

        let line = self.line_buf.trim_end_matches(&['\r', '\n'][..]);
        if line.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Empty wire frame",
            ));
        }

        let type_byte = line.as_bytes()[0];
        let content = &line[1..];

        match type_byte {
            b'+' => Ok(WireValue::SimpleString(content.to_string())),
            b'-' => Ok(WireValue::Error(content.to_string())),
            b':' => {
                let value: i64 = content
                    .parse()
                    .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "Invalid integer"))?;
                Ok(WireValue::Integer(value))
            }
            b'$' => {
                let len: i64 = content.parse().map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidData, "Invalid bulk string length")
                })?;

                if len < 0 {
                    return Ok(WireValue::Null);
                }

                let len = len as usize;
                let mut data = vec![0u8; len];
                self.reader.read_exact(&mut data)?;

                // Read trailing \r\n
                let mut crlf = [0u8; 2];
                self.reader.read_exact(&mut crlf)?;

                Ok(WireValue::BulkString(data))
            }
            b'*' => {
                let count: i64 = content.parse().map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidData, "Invalid array length")
                })?;

                if count < 0 {
                    return Ok(WireValue::Null);
                }

                let mut elements = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    elements.push(self.decode()?);
                }

                Ok(WireValue::Array(elements))
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid wire type byte: {}", type_byte as char),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_encode_simple_command() {
        let mut encoder = WireEncoder::with_capacity(64);
        encoder.encode_command_str(&["PING"]);
        assert_eq!(encoder.as_bytes(), b"*1\r\n$4\r\nPING\r\n");
    }

    #[test]
    fn test_encode_auth_command() {
        let mut encoder = WireEncoder::with_capacity(64);
        encoder.encode_command_str(&["AUTH", "elastic", "changeme"]);
        assert_eq!(
            encoder.as_bytes(),
            b"*3\r\n$4\r\nAUTH\r\n$7\r\nelastic\r\n$8\r\nchangeme\r\n"
        );
    }

    #[test]
    fn test_encode_simple_string_reply() {
        let mut encoder = WireEncoder::with_capacity(64);
        encoder.encode_value(&WireValue::SimpleString("PONG".to_string()));
        assert_eq!(encoder.as_bytes(), b"+PONG\r\n");
    }

    #[test]
    fn test_encode_error_reply() {
        let mut encoder = WireEncoder::with_capacity(64);
        encoder.encode_value(&WireValue::Error("ERR unknown command".to_string()));
        assert_eq!(encoder.as_bytes(), b"-ERR unknown command\r\n");
    }

    #[test]
    fn test_encode_bulk_reply_roundtrips() {
        let mut encoder = WireEncoder::with_capacity(64);
        encoder.encode_value(&WireValue::BulkString(b"cluster_name:test".to_vec()));

        let mut decoder = WireDecoder::new(Cursor::new(encoder.as_bytes().to_vec()));
        let value = decoder.decode().unwrap();
        assert_eq!(value, WireValue::BulkString(b"cluster_name:test".to_vec()));
    }

    #[test]
    fn test_decode_simple_string() {
        let data = b"+OK\r\n";
        let mut decoder = WireDecoder::new(Cursor::new(&data[..]));
        let value = decoder.decode().unwrap();
        assert_eq!(value, WireValue::SimpleString("OK".to_string()));
    }

    #[test]
    fn test_decode_error() {
        let data = b"-ERR unknown command\r\n";
        let mut decoder = WireDecoder::new(Cursor::new(&data[..]));
        let value = decoder.decode().unwrap();
        assert_eq!(value, WireValue::Error("ERR unknown command".to_string()));
    }

    #[test]
    fn test_decode_integer() {
        let data = b":1000\r\n";
        let mut decoder = WireDecoder::new(Cursor::new(&data[..]));
        let value = decoder.decode().unwrap();
        assert_eq!(value, WireValue::Integer(1000));
    }

    #[test]
    fn test_decode_array() {
        let data = b"*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n";
        let mut decoder = WireDecoder::new(Cursor::new(&data[..]));
        let value = decoder.decode().unwrap();
        assert_eq!(
            value,
            WireValue::Array(vec![
                WireValue::BulkString(b"foo".to_vec()),
                WireValue::BulkString(b"bar".to_vec()),
            ])
        );
    }

    #[test]
    fn test_decode_null() {
        let data = b"$-1\r\n";
        let mut decoder = WireDecoder::new(Cursor::new(&data[..]));
        let value = decoder.decode().unwrap();
        assert_eq!(value, WireValue::Null);
    }
}
