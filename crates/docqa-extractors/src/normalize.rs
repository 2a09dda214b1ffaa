//! Text normalization applied after extraction.

/// Collapse every run of whitespace into a single ASCII space and trim both ends.
///
/// Whitespace is Unicode `White_Space`, so tabs, newlines and non-breaking
/// spaces all collapse. Applying this twice gives the same result as once.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Decode UTF-8, dropping invalid byte sequences instead of replacing them.
pub fn decode_utf8_lossy(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(err) => {
                let (valid, rest) = bytes.split_at(err.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match err.error_len() {
                    Some(len) => bytes = &rest[len..],
                    // Truncated sequence at end of input
                    None => break,
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(normalize_whitespace("a  b\t\tc\n\nd"), "a b c d");
        assert_eq!(normalize_whitespace("\n  leading and trailing \r\n"), "leading and trailing");
        assert_eq!(normalize_whitespace("non\u{00A0}breaking"), "non breaking");
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \t\n "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "plain",
            "  The sky\n\nis   blue.\t",
            "line one\r\nline two\r\n\r\n",
            "mixed\u{2003}em\u{3000}spaces",
        ];
        for s in samples {
            let once = normalize_whitespace(s);
            assert_eq!(normalize_whitespace(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_decode_lossy_drops_invalid_sequences() {
        assert_eq!(decode_utf8_lossy(b"ab\xffcd"), "abcd");
        assert_eq!(decode_utf8_lossy(b"\xc3\xa9t\xc3\xa9"), "été");
        // Lone continuation byte and a truncated 3-byte sequence at the end
        assert_eq!(decode_utf8_lossy(b"x\x80y\xe2\x82"), "xy");
        assert_eq!(decode_utf8_lossy(b""), "");
    }

    #[test]
    fn test_decode_lossy_keeps_replacement_char() {
        assert_eq!(decode_utf8_lossy("a\u{FFFD}b".as_bytes()), "a\u{FFFD}b");
    }
}
