//! Lodestar - data file library for space-sim game modding.
//!
//! This crate provides a unified interface to the Lodestar crates.
//!
//! # Crates
//!
//! - [`lodestar_common`] - Common utilities (binary reading, string tables, case-insensitive keys)
//! - [`lodestar_ini`] - Text INI and binary BINI configuration files
//! - [`lodestar_utf`] - UTF asset containers and geometry records
//! - [`lodestar_template`] - Schema catalog loaded from template XML
//! - [`lodestar_editor`] - Schema-driven editor records and file-level read/write
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lodestar::prelude::*;
//!
//! let catalog = Arc::new(SchemaCatalog::open("template.xml")?);
//! let manager = FileManager::new(catalog);
//!
//! for record in manager.read_config("DATA/UNIVERSE/universe.ini")? {
//!     println!("{} {:?}", record.name, record.display_name());
//! }
//!
//! let model = CmpModel::from_tree(&manager.read_asset("ship.cmp")?)?;
//! println!("Parts: {}", model.parts().len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use lodestar_common as common;
pub use lodestar_editor as editor;
pub use lodestar_ini as ini;
pub use lodestar_template as template;
pub use lodestar_utf as utf;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use lodestar_common::{BinaryReader, CiKey, StringTable};
    pub use lodestar_editor::{
        EditorEntry, EditorOption, EditorRecord, FileManager, FormatHint, MapReport, ReadOptions, RecordMapper,
    };
    pub use lodestar_ini::{parse_blocks, BiniBuilder, BiniReader, RawBlock, RawOption, TextReader, TextWriter};
    pub use lodestar_template::{SchemaBlock, SchemaCatalog, SchemaFile, SchemaOption};
    pub use lodestar_utf::geometry::{CmpModel, Construct, VMeshData, VMeshRef};
    pub use lodestar_utf::UtfTree;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
