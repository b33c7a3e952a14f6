//! Error types for reading, mapping and writing editor records.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the editor pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration format error.
    #[error("{0}")]
    Ini(#[from] lodestar_ini::Error),

    /// Asset container error.
    #[error("{0}")]
    Utf(#[from] lodestar_utf::Error),

    /// Schema loading error.
    #[error("{0}")]
    Template(#[from] lodestar_template::Error),

    /// No schema file matches the data path.
    #[error("no schema matches {}", path.display())]
    NoSchema { path: PathBuf },

    /// A named schema file does not exist in the catalog.
    #[error("unknown schema file `{0}`")]
    UnknownSchema(String),

    /// A child option occurrence comes before the parent it would attach to.
    #[error("`{option}` at position {sequence_index} in block `{block}` precedes its parent occurrence")]
    ChildOrder {
        block: String,
        option: String,
        sequence_index: usize,
    },
}

/// Result type for editor operations.
pub type Result<T> = std::result::Result<T, Error>;
