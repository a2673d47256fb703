//! Error types for petling-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Coffee refused: the pet is not sleepy at all
    #[error("already awake and doesn't need coffee")]
    AlreadyAwake,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
