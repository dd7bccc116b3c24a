//! Error types for the quoridor crate.
//!
//! Rule violations are not errors: illegal actions are reported as `false`
//! from [`crate::movegen::play`]. What is left here are the failures of the
//! I/O boundary (cache persistence, text notation).

use thiserror::Error;

/// Main error type for the quoridor crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode transposition cache: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode transposition cache: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("unsupported cache format version {found} (expected {expected})")]
    CacheVersion { found: u32, expected: u32 },

    #[error("transposition cache holds an impossible entry: {reason}")]
    CacheInvalid { reason: String },

    #[error("invalid action '{input}': {reason}")]
    ParseAction { input: String, reason: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
