//! Error types for the language server.

use std::io;

use thiserror::Error;

/// Failure while reading or writing one framed message.
///
/// Framing is pure byte geometry: none of these variants say anything
/// about the JSON inside the body.
#[derive(Debug, Error)]
pub enum FramingError {
    /// A header line had no `:` separating name and value.
    #[error("header line has no ':' delimiter: {0:?}")]
    MissingDelimiter(String),

    /// The header block ended without a `Content-Length` header.
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// `Content-Length` was present but not a byte count.
    #[error("invalid Content-Length value: {0:?}")]
    InvalidContentLength(String),

    /// The stream ended inside a header block.
    #[error("stream ended inside the header block")]
    UnexpectedEof,

    /// The stream ended before the declared number of body bytes arrived.
    #[error("body truncated: expected {expected} bytes, got {actual}")]
    TruncatedBody {
        /// Declared `Content-Length`.
        expected: usize,
        /// Bytes available before the stream ended.
        actual: usize,
    },

    /// The underlying stream failed.
    #[error("transport I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FramingError {
    /// Whether the reader is still positioned on a message boundary.
    ///
    /// Only a stray header line qualifies: the block still declared a valid
    /// length, so its body was consumed. Without a length the body bytes are
    /// left unread and the next header cannot be found.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingDelimiter(_))
    }
}

/// Fatal session error returned from [`crate::Server::serve`].
#[derive(Debug, Error)]
pub enum ServerError {
    /// Reading or writing a frame failed beyond recovery.
    #[error(transparent)]
    Framing(#[from] FramingError),

    /// A reply could not be encoded.
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    /// The syntax provider could not be initialised.
    #[error("failed to initialise parser: {0}")]
    Syntax(#[from] pl12d_syntax::SyntaxError),
}

/// Invalid command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A flag that takes a value was last on the command line.
    #[error("option {0} requires a value")]
    MissingValue(String),

    /// An argument the server does not understand.
    #[error("unknown option: {0}")]
    UnknownOption(String),
}

/// A request that can be answered only with a JSON-RPC error.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The method is unknown or reserved.
    #[error("unhandled method")]
    MethodNotFound(String),

    /// `params` did not match the method's parameter type.
    #[error("invalid params: {0}")]
    InvalidParams(serde_json::Error),

    /// The result could not be encoded.
    #[error("failed to encode result: {0}")]
    Internal(serde_json::Error),
}

impl RequestError {
    /// JSON-RPC error code reported to the client.
    pub fn code(&self) -> lsp_server::ErrorCode {
        match self {
            Self::MethodNotFound(_) => lsp_server::ErrorCode::MethodNotFound,
            Self::InvalidParams(_) => lsp_server::ErrorCode::InvalidParams,
            Self::Internal(_) => lsp_server::ErrorCode::InternalError,
        }
    }
}
