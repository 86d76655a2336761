//! Clip record location, parsing and normalization.
//!
//! The unified stream carries exactly one primary record: an object literal
//! opening with `{"clip":{`. This module finds that candidate with a
//! depth-tracking scanner (the closing brace of a record routinely appears
//! inside nested objects, so a shortest-match search truncates), parses it
//! strictly, and falls back once to a control-character-stripped retry
//! before giving up.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::patterns::CONTROL_CHARS;

/// Opening signature of the primary record within the unified stream.
const RECORD_OPEN: &str = r#"{"clip":{"#;

/// One clip's metadata: the contents of the `clip` object, as parsed from
/// the stream and later enriched by the side-channel merge.
///
/// Serializes as `{"clip": {...}}`, the shape the JSON sidecar embeds.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Record {
    clip: Map<String, Value>,
}

impl Record {
    /// Borrow the clip mapping.
    #[must_use]
    pub fn clip(&self) -> &Map<String, Value> {
        &self.clip
    }

    /// Top-level clip field as a string, if present and a string.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.clip.get(key).and_then(Value::as_str)
    }

    /// The clip identifier.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// The song title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// The creator's display name.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.str_field("display_name")
    }

    /// Creation timestamp, as emitted by the service.
    #[must_use]
    pub fn created_at(&self) -> Option<&str> {
        self.str_field("created_at")
    }

    /// Audio media URL.
    #[must_use]
    pub fn audio_url(&self) -> Option<&str> {
        self.str_field("audio_url")
    }

    /// Video media URL.
    #[must_use]
    pub fn video_url(&self) -> Option<&str> {
        self.str_field("video_url")
    }

    /// Large cover image URL.
    #[must_use]
    pub fn image_large_url(&self) -> Option<&str> {
        self.str_field("image_large_url")
    }

    /// The nested `metadata` mapping, when present.
    #[must_use]
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.clip.get("metadata").and_then(Value::as_object)
    }

    /// A string field inside `metadata`.
    #[must_use]
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata().and_then(|m| m.get(key)).and_then(Value::as_str)
    }

    /// Insert or replace a field inside `metadata`, creating the mapping
    /// if the record came without one.
    pub fn set_metadata(&mut self, key: &str, value: Value) {
        let metadata = self
            .clip
            .entry("metadata".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = metadata {
            map.insert(key.to_string(), value);
        }
    }

    /// The generation prompt (lyrics text, or a `$N` placeholder when the
    /// pipeline deferred the text to a separate chunk).
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.metadata_str("prompt")
    }

    /// Replace the prompt text.
    pub fn set_prompt(&mut self, text: String) {
        self.set_metadata("prompt", Value::String(text));
    }

    /// Merge side-channel fields into the clip. Existing clip keys always
    /// win; only keys the record does not already carry are added.
    pub fn merge_missing(&mut self, fields: Map<String, Value>) {
        for (key, value) in fields {
            self.clip.entry(key).or_insert(value);
        }
    }

    /// Verify the record can drive downloads: the identifier and the audio
    /// URL must be present and non-empty. Absence is a hard extraction
    /// failure, never a partial result.
    pub fn ensure_downloadable(&self) -> Result<()> {
        if self.id().is_none_or(str::is_empty) {
            return Err(Error::IncompleteRecord("id"));
        }
        if self.audio_url().is_none_or(str::is_empty) {
            return Err(Error::IncompleteRecord("audio_url"));
        }
        Ok(())
    }

    /// The record as a JSON value, shaped `{"clip": {...}}`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Extract the primary record from the unified stream.
///
/// Returns `NoRecordFound` when no opening signature exists (including the
/// empty stream), and `MalformedRecord` when the candidate stays unparseable
/// after the control-character retry.
pub fn extract(stream: &str) -> Result<Record> {
    let candidate = locate_candidate(stream).ok_or(Error::NoRecordFound)?;
    let mut value = parse_candidate(candidate)?;
    trim_strings(&mut value);

    let clip = value
        .as_object_mut()
        .and_then(|root| root.remove("clip"))
        .and_then(|clip| match clip {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .ok_or(Error::IncompleteRecord("clip"))?;

    Ok(Record { clip })
}

/// Locate the first record candidate: the opening signature through its
/// true matching close, found by explicit depth tracking. A candidate that
/// never closes (truncated stream) is taken to the end of the stream so the
/// parser can report what is wrong with it.
fn locate_candidate(stream: &str) -> Option<&str> {
    let start = stream.find(RECORD_OPEN)?;
    match find_balanced_end(stream, start) {
        Some(end) => Some(&stream[start..=end]),
        None => Some(&stream[start..]),
    }
}

/// Strict parse, then a single retry with control characters stripped.
/// The retry exists because decoded payloads leave raw newlines and other
/// control bytes inside string values, which strict JSON rejects.
fn parse_candidate(candidate: &str) -> Result<Value> {
    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(original_err) => {
            let cleaned = CONTROL_CHARS.replace_all(candidate, "");
            serde_json::from_str(&cleaned).map_err(|_| Error::MalformedRecord(original_err))
        }
    }
}

/// Index of the bracket matching the opener at `open`, or `None` when the
/// text ends before the structure closes. String contents (including
/// escaped quotes) are skipped, so braces inside values never miscount.
pub(crate) fn find_balanced_end(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let (open_byte, close_byte) = match bytes.get(open)? {
        b'{' => (b'{', b'}'),
        b'[' => (b'[', b']'),
        _ => return None,
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        if b == b'"' {
            in_string = true;
        } else if b == open_byte {
            depth += 1;
        } else if b == close_byte {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }

    None
}

/// Recursively trim leading/trailing whitespace from every string value.
/// Non-string values are untouched. Idempotent.
pub(crate) fn trim_strings(value: &mut Value) {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
        Value::Array(items) => {
            for item in items {
                trim_strings(item);
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                trim_strings(item);
            }
        }
        _ => {}
    }
}
