//! Side-channel field collection.
//!
//! Alongside the primary record, the flight stream carries numbered
//! fragment declarations describing the same page: rendered document head
//! tags (`N:[["$","meta",...]]`) and occasional bare object fragments
//! (`N:{...}`). These are aggregated best-effort - a fragment that fails
//! to parse is skipped, never fatal - and merged into the record by the
//! caller with record-keys-win precedence.

use log::debug;
use serde_json::{Map, Value};

use crate::patterns::SIDE_CHANNEL_HEAD;
use crate::record::{find_balanced_end, trim_strings};

/// Reference-tagged opening of a tuple-array fragment.
const REFERENCE_ARRAY_OPEN: &str = r#"[["$""#;

/// Scan the unified stream for side-channel fragments and fold their
/// fields into one mapping. All string values are trimmed.
#[must_use]
pub fn collect(stream: &str) -> Map<String, Value> {
    let mut fields = Map::new();

    for caps in SIDE_CHANNEL_HEAD.captures_iter(stream) {
        let Some(opener) = caps.get(2) else { continue };
        let index = caps.get(1).map_or("?", |m| m.as_str());

        let Some(end) = find_balanced_end(stream, opener.start()) else {
            debug!("side-channel fragment {index} never closes; skipping");
            continue;
        };
        let candidate = &stream[opener.start()..=end];

        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Array(items)) => {
                if candidate.starts_with(REFERENCE_ARRAY_OPEN) {
                    absorb_tuples(&items, &mut fields);
                }
            }
            Ok(Value::Object(map)) => {
                fields.extend(map);
            }
            Ok(_) => {}
            Err(err) => {
                debug!("side-channel fragment {index} is unparseable, skipping: {err}");
            }
        }
    }

    for (_, value) in fields.iter_mut() {
        trim_strings(value);
    }

    fields
}

/// Pull fields out of a reference-tagged tuple array.
///
/// Each useful entry is a 4-element tuple whose 4th element is a props
/// mapping: `name`/`property` keys pair with `content` to form one field;
/// a props mapping carrying only a `children` string is kept under the
/// `children` key; everything else is ignored.
fn absorb_tuples(items: &[Value], fields: &mut Map<String, Value>) {
    for item in items {
        let Some(tuple) = item.as_array() else { continue };
        if tuple.len() != 4 {
            continue;
        }
        let Some(props) = tuple[3].as_object() else { continue };

        let key = props
            .get("name")
            .or_else(|| props.get("property"))
            .and_then(Value::as_str);

        if let Some(key) = key {
            let content = props.get("content").and_then(Value::as_str).unwrap_or("");
            fields.insert(key.to_string(), Value::String(content.trim().to_string()));
        } else if let Some(children) = props.get("children").and_then(Value::as_str) {
            fields.insert(
                "children".to_string(),
                Value::String(children.trim().to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_meta_tuple_fragments() {
        let stream = concat!(
            r##"14:[["$","meta","2",{"name":"description","content":" A song "}],"##,
            r##"["$","meta","3",{"property":"og:title","content":"Song Title"}]]"##,
        );
        let fields = collect(stream);
        assert_eq!(fields.get("description"), Some(&json!("A song")));
        assert_eq!(fields.get("og:title"), Some(&json!("Song Title")));
    }

    #[test]
    fn collects_children_fragments() {
        let stream = r#"9:[["$","title","0",{"children":" Page Title "}]]"#;
        let fields = collect(stream);
        assert_eq!(fields.get("children"), Some(&json!("Page Title")));
    }

    #[test]
    fn tuples_without_name_property_or_children_are_ignored() {
        let stream = r#"8:[["$","link","1",{"rel":"icon","href":"/favicon.ico"}]]"#;
        let fields = collect(stream);
        assert!(fields.is_empty());
    }

    #[test]
    fn object_fragments_merge_wholesale() {
        let stream = r#"4:{"extra":" C ","count":3}"#;
        let fields = collect(stream);
        assert_eq!(fields.get("extra"), Some(&json!("C")));
        assert_eq!(fields.get("count"), Some(&json!(3)));
    }

    #[test]
    fn unparseable_fragments_are_skipped_not_fatal() {
        let stream = concat!(
            r#"3:{"broken": nope}"#,
            " ",
            r##"14:[["$","meta","2",{"name":"ok","content":"yes"}]]"##,
        );
        let fields = collect(stream);
        assert_eq!(fields.get("ok"), Some(&json!("yes")));
        assert!(!fields.contains_key("broken"));
    }

    #[test]
    fn untagged_arrays_are_ignored() {
        let stream = r#"7:[[1,2,3,4]]"#;
        let fields = collect(stream);
        assert!(fields.is_empty());
    }

    #[test]
    fn empty_stream_yields_no_fields() {
        assert!(collect("").is_empty());
    }
}
