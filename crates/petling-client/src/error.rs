//! Error types for petling-client

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum Error {
    /// An inbound frame failed to decode
    #[error("protocol error: {0}")]
    Protocol(#[from] petling_proto::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
