//! UTF container parser.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use lodestar_common::{BinaryReader, StringTable};

use crate::{Error, NodeFlags, NodeId, Result, UtfHeader, UtfNodeRecord, UtfTree};

impl UtfTree {
    /// Check the tag and version without parsing the tree.
    pub fn is_utf(data: &[u8]) -> bool {
        read_header(data).is_ok()
    }

    /// Read and parse a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Parse UTF data, or `Ok(None)` if the data is not a UTF file.
    pub fn try_parse(data: &[u8]) -> Result<Option<Self>> {
        match Self::parse(data) {
            Ok(tree) => Ok(Some(tree)),
            Err(e) if e.is_format_mismatch() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Parse UTF data.
    ///
    /// A wrong tag, wrong version or a header cut short is reported as
    /// [`Error::FormatMismatch`]. Any offset that points outside the data,
    /// a name that is not in the string block or a node linked twice fails
    /// the whole read; no partial tree is returned.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = read_header(data)?;

        let reader = BinaryReader::new(data);
        let string_block = reader.slice_at(
            to_offset(header.string_block_offset, "string block offset")?,
            to_offset(header.string_block_size, "string block size")?,
        )?;

        let mut parser = Parser {
            reader,
            strings: StringTable::new(Some(string_block)),
            node_block: to_offset(header.node_block_offset, "node block offset")?,
            data_block: to_offset(header.data_block_offset, "data block offset")?,
            visited: HashSet::new(),
            tree: UtfTree::new(),
        };

        parser.read_siblings(0, UtfTree::ROOT)?;

        tracing::trace!(
            nodes = parser.tree.len(),
            leaves = parser.tree.leaf_count(),
            "parsed UTF tree"
        );
        Ok(parser.tree)
    }
}

fn read_header(data: &[u8]) -> Result<UtfHeader> {
    let mut reader = BinaryReader::new(data);
    let header: UtfHeader = reader.read_struct().map_err(|_| {
        let mut tag = [0u8; 4];
        let len = data.len().min(4);
        tag[..len].copy_from_slice(&data[..len]);
        Error::FormatMismatch { tag, version: 0 }
    })?;

    let (tag, version) = (header.tag, header.version);
    if &tag != UtfHeader::TAG || version != UtfHeader::VERSION {
        return Err(Error::FormatMismatch { tag, version });
    }
    Ok(header)
}

fn to_offset(value: i32, what: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::Malformed(format!("negative {}: {}", what, value)))
}

struct Parser<'a> {
    reader: BinaryReader<'a>,
    strings: StringTable,
    node_block: usize,
    data_block: usize,
    visited: HashSet<usize>,
    tree: UtfTree,
}

impl Parser<'_> {
    /// Read a node and all of its peers, attaching them to `parent`.
    fn read_siblings(&mut self, first: usize, parent: NodeId) -> Result<()> {
        let mut relative = first;
        loop {
            let peer = self.read_node(relative, parent)?;
            if peer <= 0 {
                return Ok(());
            }
            relative = peer as usize;
        }
    }

    /// Read one node (and, recursively, its children). Returns its peer offset.
    fn read_node(&mut self, relative: usize, parent: NodeId) -> Result<i32> {
        let offset = self
            .node_block
            .checked_add(relative)
            .ok_or_else(|| Error::Malformed(format!("node offset {} overflows", relative)))?;
        if !self.visited.insert(offset) {
            return Err(Error::NodeCycle { offset });
        }

        let mut reader = self.reader.clone();
        reader.seek(offset)?;
        let record: UtfNodeRecord = reader.read_struct()?;
        let peer_offset = record.peer_offset;
        let name_offset = record.name_offset;
        let flags = record.flags;
        let child_offset = record.child_offset;
        let allocated_size = record.allocated_size;

        if name_offset < 1 {
            return Err(Error::Malformed(format!(
                "node at offset {} has name offset {}",
                offset, name_offset
            )));
        }
        let name = self.strings.get(name_offset as usize - 1)?.to_owned();

        if flags & NodeFlags::LEAF != 0 {
            let start = self
                .data_block
                .checked_add(to_offset(child_offset, "payload offset")?)
                .ok_or_else(|| Error::Malformed(format!("payload of {:?} overflows", name)))?;
            let payload = self
                .reader
                .slice_at(start, to_offset(allocated_size, "payload size")?)?
                .to_vec();
            self.tree.push(parent, name, Some(payload));
        } else {
            let id = self.tree.push(parent, name, None);
            if flags & NodeFlags::INTERMEDIATE != 0 && child_offset > 0 {
                self.read_siblings(child_offset as usize, id)?;
            }
        }

        Ok(peer_offset)
    }
}
