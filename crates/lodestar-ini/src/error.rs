//! Error types for configuration reading and writing.

use thiserror::Error;

/// Errors that can occur when reading or writing configuration files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error (truncated data, bad string offsets).
    #[error("{0}")]
    Common(#[from] lodestar_common::Error),

    /// The data is not a BINI file. Callers fall back to the text reader.
    #[error("not a BINI file: magic {magic:?}, version {version}")]
    FormatMismatch { magic: [u8; 4], version: i32 },

    /// Structurally invalid BINI data.
    #[error("malformed BINI data: {0}")]
    Malformed(String),

    /// A value too large to encode in its BINI field.
    #[error("cannot encode {field}: {value} exceeds the maximum of {max}")]
    Overflow {
        field: &'static str,
        value: usize,
        max: usize,
    },
}

impl Error {
    /// Whether this error only means "wrong format" rather than "broken file".
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Error::FormatMismatch { .. })
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;
