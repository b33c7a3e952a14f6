//! Format selection for data that may be either text or BINI.

use crate::{BiniReader, RawBlock, Result, TextReader};

/// Which reader to use for a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatHint {
    /// Try BINI first and fall back to text.
    #[default]
    Auto,
    Text,
    Binary,
}

/// Decode configuration bytes with the reader `hint` selects.
///
/// With [`FormatHint::Auto`] anything that is not BINI is read as text,
/// but a BINI file with a damaged body is still an error.
pub fn parse_blocks(data: &[u8], hint: FormatHint, text: TextReader) -> Result<Vec<RawBlock>> {
    match hint {
        FormatHint::Binary => BiniReader::parse(data),
        FormatHint::Text => Ok(text.parse(data)),
        FormatHint::Auto => match BiniReader::try_parse(data)? {
            Some(blocks) => {
                tracing::debug!(blocks = blocks.len(), "detected BINI");
                Ok(blocks)
            }
            None => Ok(text.parse(data)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BiniBuilder;

    const TEXT: &[u8] = b"[Solar]\nnickname = Li01\n";

    #[test]
    fn test_auto_detects_both_formats() {
        let blocks = TextReader::new().parse(TEXT);
        let bini = BiniBuilder::new().build(&blocks).unwrap();

        assert_eq!(parse_blocks(TEXT, FormatHint::Auto, TextReader::new()).unwrap(), blocks);
        assert_eq!(parse_blocks(&bini, FormatHint::Auto, TextReader::new()).unwrap(), blocks);
    }

    #[test]
    fn test_forced_formats() {
        assert!(parse_blocks(TEXT, FormatHint::Binary, TextReader::new())
            .unwrap_err()
            .is_format_mismatch());

        let blocks = parse_blocks(b"BINI", FormatHint::Text, TextReader::new()).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_auto_reports_damaged_bini() {
        let mut bini = BiniBuilder::new().build(&TextReader::new().parse(TEXT)).unwrap();
        bini[8..12].copy_from_slice(&i32::MAX.to_le_bytes());
        assert!(parse_blocks(&bini, FormatHint::Auto, TextReader::new()).is_err());
    }
}
