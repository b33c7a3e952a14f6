//! Common utilities for Lodestar.
//!
//! This crate provides foundational types shared by the format crates:
//!
//! - [`BinaryReader`] - Bounds-checked little-endian reading from byte slices
//! - [`StringTable`] - Offset-indexed lookup over a NUL-delimited string blob
//! - [`CiKey`] - ASCII case-insensitive identifier used for every block and option name
//! - [`decode_text`] - Byte-to-string decoding for legacy game data

mod error;
mod key;
mod reader;
mod string_table;
mod text;

pub use error::{Error, Result};
pub use key::CiKey;
pub use reader::BinaryReader;
pub use string_table::StringTable;
pub use text::decode_text;

/// Hash map with the Fx hasher, used for every name and offset index.
pub type FxHashMap<K, V> = hashbrown::HashMap<K, V, std::hash::BuildHasherDefault<rustc_hash::FxHasher>>;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
