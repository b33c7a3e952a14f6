//! UTF chunked asset container reader for space-sim game assets.
//!
//! Models (`.cmp`, `.3db`), mesh libraries (`.vms`) and several other asset
//! kinds are stored in "UTF" files: a tree of named nodes where leaves carry
//! binary payloads. The name has nothing to do with Unicode.
//!
//! # File Format
//!
//! - 40 bytes: Header (tag `"UTF "`, version `0x101`, block offsets)
//! - Node block: linked 44-byte node records (the first 24 bytes are used)
//! - String block: NUL-delimited node names
//! - Data block: leaf payloads
//!
//! Nodes link to their next sibling and first child by offsets relative to
//! the node block. Leaf payloads are addressed relative to the data block.
//!
//! # Example
//!
//! ```no_run
//! use lodestar_utf::{geometry::CmpModel, UtfTree};
//!
//! let tree = UtfTree::open("ship.cmp")?;
//! for id in tree.iter() {
//!     println!("{}", tree.path_of(id));
//! }
//!
//! let model = CmpModel::from_tree(&tree)?;
//! for construct in model.constructs() {
//!     println!("{} -> {}", construct.parent(), construct.child());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod header;
mod node;
mod parser;

pub mod geometry;

pub use error::{Error, Result};
pub use header::{NodeFlags, UtfHeader, UtfNodeRecord};
pub use node::{NodeId, UtfNode, UtfTree, UtfTreeIter};
