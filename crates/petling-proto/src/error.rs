//! Error types for petling-proto

use thiserror::Error;

/// Protocol error type
///
/// A decode failure never mutates any state; servers answer malformed
/// frames with a `STATUS|code:400` reply built from the error's message.
#[derive(Debug, Error)]
pub enum Error {
    /// The frame was empty
    #[error("Empty frame")]
    EmptyFrame,

    /// The action tag is not part of the protocol
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A parameter was not a `key:value` pair
    #[error("Malformed parameter: {0}")]
    MalformedParam(String),

    /// A required parameter was absent
    #[error("Missing parameter: {0}")]
    MissingParam(&'static str),

    /// A numeric parameter failed to parse
    #[error("Invalid value for {key}: {value}")]
    InvalidNumber { key: &'static str, value: String },

    /// The status token is not one of normal/happi/slumber
    #[error("Unknown mood token: {0}")]
    UnknownMood(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
