//! Compiled regex patterns for stream and record extraction.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Flight-Stream Patterns
// =============================================================================

/// Matches one server-rendered push fragment:
/// `<script>self.__next_f.push([<index>,"<payload>"])</script>`.
///
/// `(?s)` lets `.` cross newlines - payloads routinely contain encoded
/// newlines, and the closing `])</script>` may sit on its own line.
/// The payload capture is non-greedy so each script element yields exactly
/// one fragment; the closing `"])` sequence never occurs unescaped inside
/// a payload.
pub static PUSH_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script>\s*self\.__next_f\.push\(\[\d+,\s*"(.*?)"\s*\]\s*\)\s*</script>"#)
        .expect("PUSH_FRAGMENT regex")
});

/// Matches the head of a numbered side-channel fragment declaration:
/// `<index>:` immediately followed by an array or object opener.
///
/// Only the head is matched; the value substring is taken by the
/// depth-tracking scanner, which copes with arbitrary nesting.
pub static SIDE_CHANNEL_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+):([\[{])").expect("SIDE_CHANNEL_HEAD regex")
});

/// Matches a `$N` chunk-reference placeholder standing in for content the
/// rendering pipeline chose not to inline.
pub static PLACEHOLDER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\d+$").expect("PLACEHOLDER_TOKEN regex"));

// =============================================================================
// Cleanup Patterns
// =============================================================================

/// Matches ASCII control characters (0x00-0x1F and DEL) that leak into
/// candidate record substrings and break strict JSON parsing.
pub static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x1f\x7f]").expect("CONTROL_CHARS regex"));

/// Matches a leftover escaped-newline token in recovered lyrics text.
pub static ESCAPED_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\+n").expect("ESCAPED_NEWLINE regex"));

// =============================================================================
// Filename Patterns
// =============================================================================

/// Characters Windows refuses in file names; also stripped from the
/// cross-platform base name so one library produces portable output.
pub static RESERVED_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("RESERVED_FILENAME_CHARS regex"));
