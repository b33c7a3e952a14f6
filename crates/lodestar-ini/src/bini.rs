//! BINI binary configuration reader.

use std::fs;
use std::path::Path;

use lodestar_common::{BinaryReader, StringTable};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, RawBlock, Result};

/// BINI file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct BiniHeader {
    /// Magic bytes, `"BINI"`.
    pub magic: [u8; 4],
    /// Format version, always 1.
    pub version: i32,
    /// Absolute offset of the string table; section data ends here.
    pub string_table_offset: i32,
}

impl BiniHeader {
    /// The magic bytes at the start of a BINI file.
    pub const MAGIC: &'static [u8; 4] = b"BINI";

    /// The only version in use.
    pub const VERSION: i32 = 1;

    /// Header size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Type tag of a single BINI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Little-endian i32.
    Int,
    /// Little-endian f32.
    Float,
    /// i32 offset into the string table.
    String,
}

impl ValueType {
    /// Tag byte as stored in the file.
    pub fn tag(self) -> u8 {
        match self {
            ValueType::Int => 1,
            ValueType::Float => 2,
            ValueType::String => 3,
        }
    }

    /// Decode a tag byte. Any unknown tag is read as a string reference.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            1 => ValueType::Int,
            2 => ValueType::Float,
            _ => ValueType::String,
        }
    }
}

/// Reader for BINI files.
///
/// Values are rendered to the same text a text file would hold (`42`,
/// `1.500000`, `Li01`), and the values of one entry are joined with `", "`,
/// so downstream code never needs to know which format a file used.
pub struct BiniReader;

impl BiniReader {
    /// Check the magic and version without parsing the body.
    pub fn is_bini(data: &[u8]) -> bool {
        Self::header(data).is_ok()
    }

    /// Read and parse a file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<RawBlock>> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Parse BINI data, or `Ok(None)` if the data is not BINI at all.
    pub fn try_parse(data: &[u8]) -> Result<Option<Vec<RawBlock>>> {
        match Self::parse(data) {
            Ok(blocks) => Ok(Some(blocks)),
            Err(e) if e.is_format_mismatch() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Parse BINI data.
    ///
    /// Fails with [`Error::FormatMismatch`] when the header does not match,
    /// and with a malformed-data error on any structural problem after that.
    pub fn parse(data: &[u8]) -> Result<Vec<RawBlock>> {
        let header = Self::header(data)?;

        let string_table_offset = header.string_table_offset;
        let table_start = usize::try_from(string_table_offset)
            .ok()
            .filter(|&offset| offset >= BiniHeader::SIZE && offset <= data.len())
            .ok_or_else(|| {
                Error::Malformed(format!(
                    "string table offset {} outside file of {} bytes",
                    string_table_offset,
                    data.len()
                ))
            })?;

        let strings = StringTable::new(Some(&data[table_start..]));
        let mut reader = BinaryReader::new_at(&data[..table_start], BiniHeader::SIZE)?;
        let mut blocks = Vec::new();

        while !reader.is_empty() {
            let name = strings.get(reader.read_u16()? as usize)?;
            let entry_count = reader.read_u16()?;
            let mut block = RawBlock::new(name);

            for _ in 0..entry_count {
                let key = strings.get(reader.read_u16()? as usize)?;
                let value_count = reader.read_u8()?;

                let mut values = Vec::with_capacity(value_count as usize);
                for _ in 0..value_count {
                    values.push(Self::read_value(&mut reader, &strings)?);
                }
                block.push(key, values.join(", "));
            }

            blocks.push(block);
        }

        tracing::trace!(blocks = blocks.len(), strings = strings.len(), "parsed BINI data");
        Ok(blocks)
    }

    fn header(data: &[u8]) -> Result<BiniHeader> {
        let mut reader = BinaryReader::new(data);
        let header: BiniHeader = reader.read_struct().map_err(|_| Error::FormatMismatch {
            magic: prefix(data),
            version: 0,
        })?;
        let (magic, version) = (header.magic, header.version);
        if &magic != BiniHeader::MAGIC || version != BiniHeader::VERSION {
            return Err(Error::FormatMismatch { magic, version });
        }
        Ok(header)
    }

    fn read_value(reader: &mut BinaryReader<'_>, strings: &StringTable) -> Result<String> {
        let value = match ValueType::from_tag(reader.read_u8()?) {
            ValueType::Int => reader.read_i32()?.to_string(),
            ValueType::Float => format!("{:.6}", reader.read_f32()?),
            ValueType::String => {
                let offset = reader.read_i32()?;
                let offset = usize::try_from(offset)
                    .map_err(|_| Error::Malformed(format!("negative string offset {}", offset)))?;
                strings.get(offset)?.to_owned()
            }
        };
        Ok(value)
    }
}

fn prefix(data: &[u8]) -> [u8; 4] {
    let mut magic = [0u8; 4];
    let len = data.len().min(4);
    magic[..len].copy_from_slice(&data[..len]);
    magic
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-assembled file: `[Solar]` with `nickname = Li01` and
    /// `pos = 1, 2.500000`.
    fn sample() -> Vec<u8> {
        let strings = b"Solar\0nickname\0Li01\0pos\0";
        let mut body = Vec::new();
        // section: name "Solar" (0), 2 entries
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&2u16.to_le_bytes());
        // entry: "nickname" (6), 1 value: string "Li01" (15)
        body.extend_from_slice(&6u16.to_le_bytes());
        body.push(1);
        body.push(3);
        body.extend_from_slice(&15i32.to_le_bytes());
        // entry: "pos" (20), 2 values: int 1, float 2.5
        body.extend_from_slice(&20u16.to_le_bytes());
        body.push(2);
        body.push(1);
        body.extend_from_slice(&1i32.to_le_bytes());
        body.push(2);
        body.extend_from_slice(&2.5f32.to_le_bytes());

        let mut data = Vec::new();
        data.extend_from_slice(b"BINI");
        data.extend_from_slice(&1i32.to_le_bytes());
        data.extend_from_slice(&((12 + body.len()) as i32).to_le_bytes());
        data.extend_from_slice(&body);
        data.extend_from_slice(strings);
        data
    }

    #[test]
    fn test_parse_sample() {
        let blocks = BiniReader::parse(&sample()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "Solar");
        assert_eq!(blocks[0].options.get("nickname").next().unwrap().value, "Li01");
        let pos = blocks[0].options.get("pos").next().unwrap();
        assert_eq!(pos.value, "1, 2.500000");
        assert_eq!(pos.sequence_index, 1);
    }

    #[test]
    fn test_not_bini_is_mismatch() {
        assert!(!BiniReader::is_bini(b"[Solar]\nnickname = Li01\n"));
        assert!(BiniReader::try_parse(b"[Solar]\n").unwrap().is_none());
        assert!(BiniReader::try_parse(b"BI").unwrap().is_none());

        let mut wrong_version = sample();
        wrong_version[4] = 2;
        let err = BiniReader::parse(&wrong_version).unwrap_err();
        assert!(matches!(err, Error::FormatMismatch { version: 2, .. }));
    }

    #[test]
    fn test_truncated_body_is_fatal() {
        let mut data = sample();
        // Point the string table one byte earlier so the last value is cut.
        let offset = i32::from_le_bytes([data[8], data[9], data[10], data[11]]) - 1;
        data[8..12].copy_from_slice(&offset.to_le_bytes());

        let err = BiniReader::try_parse(&data).unwrap_err();
        assert!(!err.is_format_mismatch());
    }

    #[test]
    fn test_bad_string_offset_is_fatal() {
        let mut data = sample();
        // Entry name "nickname" at 6 -> 7 (mid-string).
        data[16] = 7;
        assert!(matches!(
            BiniReader::parse(&data),
            Err(Error::Common(lodestar_common::Error::StringNotFound { offset: 7 }))
        ));
    }

    #[test]
    fn test_string_table_offset_out_of_range() {
        let mut data = sample();
        data[8..12].copy_from_slice(&9999i32.to_le_bytes());
        assert!(matches!(BiniReader::parse(&data), Err(Error::Malformed(_))));
    }

    #[test]
    fn test_value_type_tags() {
        assert_eq!(ValueType::from_tag(1), ValueType::Int);
        assert_eq!(ValueType::from_tag(2), ValueType::Float);
        assert_eq!(ValueType::from_tag(3), ValueType::String);
        assert_eq!(ValueType::from_tag(9), ValueType::String);
    }
}
