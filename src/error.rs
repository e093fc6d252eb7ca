//! Unified error types for the Floker client.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level poll loop's error handling uniform.
//! The poll cycle itself never surfaces these — a failed read or batch is
//! logged and skipped — but the explicit `read`/`write`/`multi` passthroughs
//! on the client funnel their failures into this type.

use core::fmt;

use crate::client::codec::CodecError;
use crate::client::transport::TransportError;

// ---------------------------------------------------------------------------
// Top-level client error
// ---------------------------------------------------------------------------

/// Every fallible operation in the client funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The HTTP transport failed (non-200 status or connection error).
    Transport(TransportError),
    /// A batched request or response body could not be built or decoded.
    Codec(CodecError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Codec(e) => write!(f, "codec: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Client-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
