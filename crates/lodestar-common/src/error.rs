//! Error types for lodestar-common.

use thiserror::Error;

/// Common error type for Lodestar operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes at offset {offset} but only {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Seek or slice outside of the buffer.
    #[error("offset {offset} out of bounds (buffer size: {size})")]
    OffsetOutOfBounds { offset: usize, size: usize },

    /// A string table offset that does not start a recorded string.
    #[error("no string starts at string table offset {offset}")]
    StringNotFound { offset: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
