//! Error types for UTF parsing and geometry decoding.

use thiserror::Error;

/// Errors that can occur when reading UTF files or decoding their payloads.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error (truncated data, bad string offsets).
    #[error("{0}")]
    Common(#[from] lodestar_common::Error),

    /// The data is not a UTF file.
    #[error("not a UTF file: tag {tag:?}, version {version:#x}")]
    FormatMismatch { tag: [u8; 4], version: i32 },

    /// Structurally invalid container data.
    #[error("malformed UTF data: {0}")]
    Malformed(String),

    /// A node is reachable twice through peer/child links.
    #[error("node at offset {offset} is linked more than once")]
    NodeCycle { offset: usize },

    /// A node the decoder needs is missing from the tree.
    #[error("missing node: {0}")]
    MissingNode(String),

    /// A record blob whose length is not a whole number of records.
    #[error("{kind} data of {size} bytes is not a multiple of the {record}-byte record size")]
    InvalidRecordSize {
        kind: &'static str,
        size: usize,
        record: usize,
    },

    /// Vertex layout without positions or with an unexpected size.
    #[error("unsupported vertex format {0:#06x}")]
    UnsupportedVertexFormat(u16),

    /// A name that does not fit its fixed-size field.
    #[error("name {name:?} does not fit in {max} bytes")]
    NameTooLong { name: String, max: usize },
}

impl Error {
    /// Whether this error only means "not a UTF file".
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Error::FormatMismatch { .. })
    }
}

/// Result type for UTF operations.
pub type Result<T> = std::result::Result<T, Error>;
