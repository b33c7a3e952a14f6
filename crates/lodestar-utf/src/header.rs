//! UTF header and node record structures.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// UTF file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct UtfHeader {
    /// Tag bytes, `"UTF "`.
    pub tag: [u8; 4],
    /// Format version, always `0x101`.
    pub version: i32,
    /// Absolute offset of the node block.
    pub node_block_offset: i32,
    /// Size of the node block (unused).
    pub node_block_size: i32,
    /// Unused.
    pub reserved: i32,
    /// Size of one node record (unused).
    pub node_record_size: i32,
    /// Absolute offset of the string block.
    pub string_block_offset: i32,
    /// Allocated size of the string block.
    pub string_block_size: i32,
    /// Used size of the string block (unused).
    pub string_block_used: i32,
    /// Absolute offset of the data block.
    pub data_block_offset: i32,
}

impl UtfHeader {
    /// Tag bytes at the start of a UTF file.
    pub const TAG: &'static [u8; 4] = b"UTF ";

    /// The only version in use.
    pub const VERSION: i32 = 0x101;

    /// Header size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// The fixed leading part of a node record.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct UtfNodeRecord {
    /// Offset of the next sibling, relative to the node block; 0 if last.
    pub peer_offset: i32,
    /// One-based offset of the name in the string block.
    pub name_offset: i32,
    /// [`NodeFlags`] bits.
    pub flags: i32,
    /// Unused.
    pub reserved: i32,
    /// First child (relative to the node block) for intermediate nodes,
    /// payload offset (relative to the data block) for leaves.
    pub child_offset: i32,
    /// Payload length for leaves.
    pub allocated_size: i32,
}

impl UtfNodeRecord {
    /// Size of the fields read from each record.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Node kind bits.
pub struct NodeFlags;

impl NodeFlags {
    /// Node has children.
    pub const INTERMEDIATE: i32 = 0x10;
    /// Node carries a payload.
    pub const LEAF: i32 = 0x80;
}
