//! BINI encoder.
//!
//! Produces files [`BiniReader`](crate::BiniReader) reads back to the same
//! blocks, modulo value normalization: every comma-separated value is
//! stored as an int, a float or a string, and floats come back with six
//! decimals.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use lodestar_common::FxHashMap;

use crate::{BiniHeader, Error, RawBlock, Result, ValueType};

/// Unreferenced string placed after the empty string in the table.
///
/// Readers trim NULs at both ends of the table, so an empty string is only
/// addressable with a non-empty string on either side.
const EMPTY_GUARD: &[u8] = b"-";

/// A body field that refers to the empty string, patched once the table
/// layout is known.
#[derive(Debug, Clone, Copy)]
enum EmptyRef {
    Name(usize),
    Value(usize),
}

/// Builder for BINI bytes.
///
/// # Example
///
/// ```
/// use lodestar_ini::{BiniBuilder, BiniReader, RawBlock};
///
/// let blocks = vec![RawBlock::new("Solar").with("nickname", "Li01").with("radius", "456")];
/// let bytes = BiniBuilder::new().build(&blocks).unwrap();
///
/// let parsed = BiniReader::parse(&bytes).unwrap();
/// assert_eq!(parsed[0].options.get("radius").next().unwrap().value, "456");
/// ```
#[derive(Debug, Default)]
pub struct BiniBuilder {
    strings: Vec<u8>,
    offsets: FxHashMap<String, usize>,
    empty_refs: Vec<EmptyRef>,
}

impl BiniBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `blocks` into a complete BINI file.
    pub fn build(mut self, blocks: &[RawBlock]) -> Result<Vec<u8>> {
        let mut body = Vec::new();

        for block in blocks {
            self.write_name(&mut body, &block.name)?;
            body.write_u16::<LittleEndian>(checked(block.options.len(), "entry count", u16::MAX as usize)? as u16)?;

            for (key, option) in block.options.iter() {
                let values = split_values(&option.value);
                self.write_name(&mut body, key.as_str())?;
                body.write_u8(checked(values.len(), "value count", u8::MAX as usize)? as u8)?;

                for value in values {
                    self.write_value(&mut body, value)?;
                }
            }
        }

        self.place_empty(&mut body)?;

        let table_offset = BiniHeader::SIZE + body.len();
        let table_offset = checked(table_offset, "string table offset", i32::MAX as usize)?;

        let mut out = Vec::with_capacity(table_offset + self.strings.len());
        out.extend_from_slice(BiniHeader::MAGIC);
        out.write_i32::<LittleEndian>(BiniHeader::VERSION)?;
        out.write_i32::<LittleEndian>(table_offset as i32)?;
        out.extend_from_slice(&body);
        out.extend_from_slice(&self.strings);
        Ok(out)
    }

    fn write_value(&mut self, body: &mut Vec<u8>, value: &str) -> Result<()> {
        match classify(value) {
            ValueType::Int => {
                body.write_u8(ValueType::Int.tag())?;
                body.write_i32::<LittleEndian>(value.parse().unwrap_or_default())?;
            }
            ValueType::Float => {
                body.write_u8(ValueType::Float.tag())?;
                body.write_f32::<LittleEndian>(value.parse().unwrap_or_default())?;
            }
            ValueType::String => {
                body.write_u8(ValueType::String.tag())?;
                let offset = if value.is_empty() {
                    self.empty_refs.push(EmptyRef::Value(body.len()));
                    0
                } else {
                    self.intern(value)
                };
                body.write_i32::<LittleEndian>(checked(offset, "string offset", i32::MAX as usize)? as i32)?;
            }
        }
        Ok(())
    }

    fn write_name(&mut self, body: &mut Vec<u8>, name: &str) -> Result<()> {
        let offset = if name.is_empty() {
            self.empty_refs.push(EmptyRef::Name(body.len()));
            0
        } else {
            self.intern(name)
        };
        body.write_u16::<LittleEndian>(checked(offset, "name offset", u16::MAX as usize)? as u16)?;
        Ok(())
    }

    /// Append the empty string between two non-empty strings and point
    /// every reference to it there.
    fn place_empty(&mut self, body: &mut [u8]) -> Result<()> {
        if self.empty_refs.is_empty() {
            return Ok(());
        }

        if self.strings.is_empty() {
            self.strings.extend_from_slice(EMPTY_GUARD);
            self.strings.push(0);
        }
        let offset = self.strings.len();
        self.strings.push(0);
        self.strings.extend_from_slice(EMPTY_GUARD);
        self.strings.push(0);

        for empty_ref in &self.empty_refs {
            match *empty_ref {
                EmptyRef::Name(at) => {
                    let offset = checked(offset, "name offset", u16::MAX as usize)? as u16;
                    LittleEndian::write_u16(&mut body[at..at + 2], offset);
                }
                EmptyRef::Value(at) => {
                    let offset = checked(offset, "string offset", i32::MAX as usize)? as i32;
                    LittleEndian::write_i32(&mut body[at..at + 4], offset);
                }
            }
        }
        Ok(())
    }

    fn intern(&mut self, text: &str) -> usize {
        if let Some(&offset) = self.offsets.get(text) {
            return offset;
        }
        let offset = self.strings.len();
        self.strings.extend_from_slice(text.as_bytes());
        self.strings.push(0);
        self.offsets.insert(text.to_owned(), offset);
        offset
    }
}

fn checked(value: usize, field: &'static str, max: usize) -> Result<usize> {
    if value > max {
        return Err(Error::Overflow { field, value, max });
    }
    Ok(value)
}

fn split_values(value: &str) -> Vec<&str> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::trim).collect()
}

/// Pick the storage type for a single value.
fn classify(value: &str) -> ValueType {
    if value.parse::<i32>().is_ok() {
        return ValueType::Int;
    }
    let numeric = !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
        && value.bytes().any(|b| b.is_ascii_digit());
    if numeric && value.parse::<f32>().is_ok() {
        ValueType::Float
    } else {
        ValueType::String
    }
}
