//! Language server for the 12d Programming Language (12dPL).
//!
//! Speaks the Language Server Protocol over a byte stream (stdio in the
//! binary) and provides:
//! - Go-to-definition for functions, parameters, locals and `#define`s
//! - Whole-document formatting
//! - Completion with resolve, and hover documentation
//!
//! # Architecture
//!
//! ```text
//! reader ─► transport ─► Server::handle_message ─► handlers ─► pl12d-syntax
//!                              │                       ▲
//!                              ▼                       │
//!                        DocumentStore ── text snapshot┘
//! ```
//!
//! The session is single-threaded: each message is answered before the
//! next one is read.

pub mod config;
pub mod error;
pub mod format;
pub mod handlers;
pub mod server;
pub mod store;
pub mod transport;

pub use config::{Command, ServerConfig};
pub use error::{ConfigError, FramingError, ServerError};
pub use server::{Phase, Server};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
