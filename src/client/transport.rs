//! Transport abstraction — one request/response exchange per call.
//!
//! Concrete implementations:
//! - ESP-IDF HTTP client (on device)
//! - `ureq` blocking client (host-side tools and tests)
//!
//! The poll engine is generic over `Transport`, so swapping the HTTP stack
//! requires zero changes to the synchronization logic. Every call opens one
//! underlying connection, performs one request and closes the connection;
//! an `Err` corresponds to anything other than an HTTP 200.

use core::fmt;

/// Synchronous request/response channel to the Floker server.
pub trait Transport {
    /// Fetch the current state of `topic`.
    fn read(&mut self, topic: &str) -> Result<String, TransportError>;

    /// Set the state of `topic` to `state`.
    fn write(&mut self, topic: &str, state: &str) -> Result<(), TransportError>;

    /// Submit a batched task array (`body` is the JSON request array) and
    /// return the raw JSON response array.
    fn multi(&mut self, body: &str) -> Result<String, TransportError>;
}

/// Why a transport exchange failed.
///
/// The core treats every variant identically (skip the channel or drop the
/// batch); the distinction exists for logging and for host-side tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a non-200 status.
    Status(u16),
    /// The connection could not be established or was dropped mid-exchange.
    Connection(String),
    /// The response body could not be read.
    Io(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::Connection(msg) => write!(f, "connection failed: {msg}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

/// A null transport that fails every exchange.
/// Useful as a placeholder while the network is still coming up.
pub struct NullTransport;

impl Transport for NullTransport {
    fn read(&mut self, _topic: &str) -> Result<String, TransportError> {
        Err(TransportError::Connection(String::from("null transport")))
    }

    fn write(&mut self, _topic: &str, _state: &str) -> Result<(), TransportError> {
        Err(TransportError::Connection(String::from("null transport")))
    }

    fn multi(&mut self, _body: &str) -> Result<String, TransportError> {
        Err(TransportError::Connection(String::from("null transport")))
    }
}
