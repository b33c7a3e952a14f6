//! Text decoding for game data.

/// Decode bytes as UTF-8 when valid, otherwise as Latin-1.
///
/// Game data predates UTF-8 and is written in the system code page. Latin-1
/// maps every byte to exactly one char, so decoding never fails and ASCII
/// text is unchanged either way.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text(b"nickname"), "nickname");
        assert_eq!(decode_text("Zo\u{eb}".as_bytes()), "Zo\u{eb}");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // 0xEB is 'ë' in Latin-1 and not valid UTF-8 on its own.
        assert_eq!(decode_text(b"Zo\xEB"), "Zo\u{eb}");
    }
}
