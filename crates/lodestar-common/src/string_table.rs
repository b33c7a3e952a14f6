//! NUL-delimited string tables.
//!
//! Both binary formats keep their names in a blob of packed NUL-terminated
//! strings and reference them by byte offset. Leading and trailing NULs are
//! trimmed before splitting, so offsets are relative to the first non-NUL
//! byte of the blob.

use crate::text::decode_text;
use crate::{Error, FxHashMap, Result};

/// Offset-indexed view over a NUL-delimited string blob.
///
/// # Example
///
/// ```
/// use lodestar_common::StringTable;
///
/// let table = StringTable::new(Some(b"ab\0c\0"));
/// assert_eq!(table.get(0).unwrap(), "ab");
/// assert_eq!(table.get(3).unwrap(), "c");
/// assert!(table.get(1).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    strings: FxHashMap<usize, String>,
}

impl StringTable {
    /// Build a table from a blob. `None` yields an empty table.
    pub fn new(data: Option<&[u8]>) -> Self {
        let Some(data) = data else {
            return Self::default();
        };

        let start = data.iter().position(|&b| b != 0).unwrap_or(data.len());
        let end = data.iter().rposition(|&b| b != 0).map_or(start, |i| i + 1);
        let trimmed = &data[start..end];

        if trimmed.is_empty() {
            return Self::default();
        }

        let mut strings = FxHashMap::default();
        let mut offset = 0;
        for nul in memchr::memchr_iter(0, trimmed).chain(std::iter::once(trimmed.len())) {
            strings.insert(offset, decode_text(&trimmed[offset..nul]));
            offset = nul + 1;
        }

        Self { strings }
    }

    /// Look up the string starting at `offset`.
    ///
    /// An offset that is not the start of a string means the referencing
    /// record is corrupt.
    pub fn get(&self, offset: usize) -> Result<&str> {
        self.strings
            .get(&offset)
            .map(String::as_str)
            .ok_or(Error::StringNotFound { offset })
    }

    /// Number of strings in the table.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether the table holds no strings.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_at_string_starts() {
        let table = StringTable::new(Some(b"ab\0c\0"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).unwrap(), "ab");
        assert_eq!(table.get(3).unwrap(), "c");
    }

    #[test]
    fn test_mid_string_offset_fails() {
        let table = StringTable::new(Some(b"ab\0c\0"));
        assert!(matches!(table.get(1), Err(Error::StringNotFound { offset: 1 })));
        assert!(table.get(5).is_err());
    }

    #[test]
    fn test_leading_nul_trimmed() {
        // Asset string blocks open with a NUL; offsets shift down by one.
        let table = StringTable::new(Some(b"\0\\\0Cmpnd\0\0"));
        assert_eq!(table.get(0).unwrap(), "\\");
        assert_eq!(table.get(2).unwrap(), "Cmpnd");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_inner_empty_string_kept() {
        let table = StringTable::new(Some(b"a\0\0b"));
        assert_eq!(table.get(0).unwrap(), "a");
        assert_eq!(table.get(2).unwrap(), "");
        assert_eq!(table.get(3).unwrap(), "b");
    }

    #[test]
    fn test_absent_and_empty() {
        assert!(StringTable::new(None).is_empty());
        assert!(StringTable::new(Some(b"")).is_empty());
        assert!(StringTable::new(Some(b"\0\0\0")).is_empty());
    }
}
