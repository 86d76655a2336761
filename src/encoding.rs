//! Character decoding for fetched page bodies.
//!
//! Suno serves UTF-8, but the fetch layer hands the extraction core raw
//! bytes, so the charset is sniffed from the document head rather than
//! assumed. Invalid sequences are replaced, never fatal.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Charset declaration in the document head, either form:
/// `<meta charset="...">` or `<meta http-equiv=... charset=...>`.
#[allow(clippy::expect_used)]
static CHARSET_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("CHARSET_DECL regex")
});

/// Decode a fetched page body to UTF-8 text.
///
/// Sniffs the charset from the first 1024 bytes of the document; defaults
/// to UTF-8 when no declaration is found. Undecodable sequences become
/// U+FFFD rather than errors.
#[must_use]
pub fn decode_page(body: &[u8]) -> String {
    let encoding = sniff_charset(body);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(body).into_owned();
    }
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

fn sniff_charset(body: &[u8]) -> &'static Encoding {
    let head = &body[..body.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    CHARSET_DECL
        .captures(&head_str)
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passthrough() {
        let body = "<html><head><meta charset=\"utf-8\"></head><body>ok</body></html>";
        assert_eq!(decode_page(body.as_bytes()), body);
    }

    #[test]
    fn defaults_to_utf8_without_declaration() {
        assert_eq!(sniff_charset(b"<html><body>x</body></html>"), UTF_8);
    }

    #[test]
    fn decodes_declared_legacy_charset() {
        let body = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
        assert!(decode_page(body).contains("Caf\u{e9}"));
    }

    #[test]
    fn sniffs_http_equiv_form() {
        let head = br#"<meta http-equiv="Content-Type" content="text/html; charset=windows-1252">"#;
        assert_eq!(sniff_charset(head).name(), "windows-1252");
    }

    #[test]
    fn invalid_bytes_become_replacement_chars() {
        let body = b"<html><body>ok \xFF\xFE still ok</body></html>";
        let text = decode_page(body);
        assert!(text.contains("ok"));
        assert!(text.contains("still ok"));
    }
}
