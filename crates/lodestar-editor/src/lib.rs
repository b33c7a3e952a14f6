//! Schema-driven editing of space-sim configuration files.
//!
//! Raw blocks from the text or BINI readers are projected through a
//! [`SchemaFile`](lodestar_template::SchemaFile) into [`EditorRecord`]s:
//! one [`EditorOption`] per declared option, in declaration order, with
//! repeated parent/child option groups folded into one [`EditorEntry`] per
//! parent occurrence. [`RecordMapper::unmap`] flattens records back into
//! raw blocks for writing.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lodestar_editor::FileManager;
//! use lodestar_template::SchemaCatalog;
//!
//! let catalog = Arc::new(SchemaCatalog::open("template.xml")?);
//! let manager = FileManager::new(catalog);
//!
//! let mut records = manager.read_config("DATA/UNIVERSE/SYSTEMS/LI01/li01.ini")?;
//! for record in &mut records {
//!     if record.display_name() == Some("Li01_01") {
//!         record.set_single("visit", "128");
//!     }
//! }
//! manager.write_config("li01.ini", &records)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod manager;
mod mapper;
mod model;

pub use config::{FormatHint, ReadOptions};
pub use error::{Error, Result};
pub use manager::FileManager;
pub use mapper::{MapReport, RecordMapper};
pub use model::{EditorEntry, EditorOption, EditorRecord, EMPTY_MARKER};
