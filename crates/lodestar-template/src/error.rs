//! Error types for schema loading.

use thiserror::Error;

/// Errors that can occur when loading a schema catalog.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML syntax error.
    #[error("XML error: {0}")]
    Xml(String),

    /// A required attribute is missing.
    #[error("<{element}> is missing the `{attribute}` attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// An attribute value could not be interpreted.
    #[error("invalid value {value:?} for `{attribute}`: {reason}")]
    InvalidValue {
        attribute: &'static str,
        value: String,
        reason: String,
    },

    /// A child option whose parent is not the option declared right before it.
    #[error("option `{option}` in block `{block}` names parent `{parent}`, which is not the preceding top-level option")]
    UnknownParent {
        block: String,
        option: String,
        parent: String,
    },

    /// An element appears where the schema layout does not allow it.
    #[error("unexpected <{element}> inside <{parent}>")]
    UnexpectedElement { element: String, parent: String },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, Error>;
