//! Error types.
use thiserror::Error;

/// Errors returned by sizing, hashing and filter operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A parameter is out of range or two filters are not compatible.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The hash strategy could not produce a value.
    #[error("Hash failure: {0}")]
    HashFailure(String),
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
