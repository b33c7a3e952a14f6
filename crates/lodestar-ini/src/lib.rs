//! Configuration file formats for space-sim game data.
//!
//! Game configuration is stored as blocks of `key = value` options, either
//! as human-readable text or in a compact binary encoding ("BINI"). Both
//! formats decode into the same raw model: an ordered list of [`RawBlock`]s
//! whose options keep their exact file order.
//!
//! # Text Format
//!
//! ```text
//! [Object]
//! nickname = Li01_01
//! pos = 0, 0, 0        ; comments start at ';'
//! ```
//!
//! # Binary Format
//!
//! - 4 bytes: Magic ("BINI")
//! - 4 bytes: Version (1)
//! - 4 bytes: String table offset
//! - Section records: name offset (u16), entry count (u16)
//! - Entry records: name offset (u16), value count (u8)
//! - Value records: type (u8), then an i32, f32 or string offset
//! - NUL-delimited string table
//!
//! # Example
//!
//! ```no_run
//! use lodestar_ini::{parse_blocks, FormatHint, TextReader, TextWriter};
//!
//! let data = std::fs::read("universe.ini")?;
//!
//! // Binary files decode to the same blocks a text file would produce.
//! let blocks = parse_blocks(&data, FormatHint::Auto, TextReader::new())?;
//!
//! std::fs::write("universe.txt.ini", TextWriter::to_string(&blocks))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bini;
mod builder;
mod error;
mod format;
mod raw;
mod text;

pub use bini::{BiniHeader, BiniReader, ValueType};
pub use builder::BiniBuilder;
pub use error::{Error, Result};
pub use format::{parse_blocks, FormatHint};
pub use raw::{RawBlock, RawOption, RawOptions};
pub use text::{TextReader, TextWriter};
