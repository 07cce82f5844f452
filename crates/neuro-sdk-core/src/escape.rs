//! String escaping for embedding text in outbound frames
//!
//! This is intentionally not JSON string escaping: `'` becomes `\'` and every byte outside
//! printable ASCII becomes `\xHH`. The agent side expects exactly this form.

use std::fmt::Write;

/// Escape `input` byte by byte
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    escape_into(&mut out, input);
    out
}

/// Append the escaped form of `input` to `out`
pub fn escape_into(out: &mut String, input: &str) {
    for &byte in input.as_bytes() {
        match byte {
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\'' => out.push_str("\\'"),
            32..=126 => out.push(byte as char),
            _ => {
                // Writing to a String cannot fail.
                let _ = write!(out, "\\x{:02X}", byte);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii_unchanged() {
        assert_eq!(escape("Hello, World! 0-8 {}[]"), "Hello, World! 0-8 {}[]");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(escape("a\nb\tc\rd"), "a\\nb\\tc\\rd");
        assert_eq!(escape(r#"say "hi" \ bye"#), r#"say \"hi\" \\ bye"#);
    }

    #[test]
    fn test_single_quote_is_escaped_non_standard() {
        let escaped = escape("it's");
        assert_eq!(escaped, "it\\'s");
        // A strict JSON decoder rejects `\'`; this is the expected wire form.
        let as_json = format!("\"{}\"", escaped);
        assert!(serde_json::from_str::<String>(&as_json).is_err());
    }

    #[test]
    fn test_control_and_non_ascii_bytes_become_hex() {
        assert_eq!(escape("\u{1}"), "\\x01");
        assert_eq!(escape("\u{7f}"), "\\x7F");
        // U+00E9 is two UTF-8 bytes
        assert_eq!(escape("é"), "\\xC3\\xA9");
    }

    #[test]
    fn test_standard_escapes_decode_as_json() {
        let source = "line1\nline2\t\"quoted\"\\\r";
        let as_json = format!("\"{}\"", escape(source));
        let decoded: String = serde_json::from_str(&as_json).unwrap();
        assert_eq!(decoded, source);
    }
}
