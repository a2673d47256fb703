//! Error types for petling-server

use crate::session::SessionId;
use thiserror::Error;

/// Result type for petling-server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in petling-server
///
/// An `UnknownSession` is a benign disconnect race: the caller drops the
/// frame instead of answering it. Nothing here is fatal to the process;
/// per-session failures stay isolated to that session.
#[derive(Debug, Error)]
pub enum Error {
    /// The session was already torn down
    #[error("session {0} not found")]
    UnknownSession(SessionId),

    /// Protocol error
    #[error("protocol error: {0}")]
    Protocol(#[from] petling_proto::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Transport error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
