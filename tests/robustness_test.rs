//! Robustness tests: corrupted streams, damaged candidates, odd encodings.

use suno_dl::{extract, extract_bytes, Error};

fn page(payloads: &[&str]) -> String {
    payloads
        .iter()
        .map(|payload| format!("<script>self.__next_f.push([1,\"{payload}\"])</script>"))
        .collect()
}

#[test]
fn control_characters_are_recovered_by_the_retry() {
    // \x01 decodes to a raw control byte inside a string value, which
    // strict JSON rejects; the cleanup retry must absorb it.
    let html = page(&[
        r#"{\"clip\":{\"id\":\"x\x011\",\"audio_url\":\"https://cdn/x1.mp3\"}}"#,
    ]);

    let record = extract(&html).unwrap();
    assert_eq!(record.id(), Some("x1"));
}

#[test]
fn embedded_newlines_in_values_are_recovered() {
    // A \n token inside a string decodes to a literal newline - a control
    // character as far as strict JSON is concerned.
    let html = page(&[
        r#"{\"clip\":{\"id\":\"x1\",\"title\":\"line one\nline two\",\"audio_url\":\"https://cdn/x1.mp3\"}}"#,
    ]);

    let record = extract(&html).unwrap();
    assert_eq!(record.title(), Some("line oneline two"));
}

#[test]
fn truncated_record_is_malformed_not_missing() {
    let html = page(&[r#"{\"clip\":{\"id\":\"x1\",\"title\":\"Son"#]);
    assert!(matches!(extract(&html), Err(Error::MalformedRecord(_))));
}

#[test]
fn structurally_broken_record_fails_after_retry() {
    let html = page(&[r#"{\"clip\":{\"id\":\"x1\",\"title\":}}"#]);
    assert!(matches!(extract(&html), Err(Error::MalformedRecord(_))));
}

#[test]
fn broken_side_channel_fragment_does_not_abort_extraction() {
    let html = page(&[
        r#"{\"clip\":{\"id\":\"x1\",\"audio_url\":\"https://cdn/x1.mp3\"}}"#,
        r#"3:{broken fragment}"#,
        r#"14:[[\"$\",\"meta\",\"2\",{\"name\":\"ok\",\"content\":\"yes\"}]]"#,
    ]);

    let record = extract(&html).unwrap();
    assert_eq!(record.str_field("ok"), Some("yes"));
    assert!(!record.clip().contains_key("broken"));
}

#[test]
fn missing_audio_url_is_a_hard_failure() {
    let html = page(&[r#"{\"clip\":{\"id\":\"x1\",\"title\":\"A\"}}"#]);
    assert!(matches!(
        extract(&html),
        Err(Error::IncompleteRecord("audio_url"))
    ));
}

#[test]
fn missing_id_is_a_hard_failure() {
    let html = page(&[r#"{\"clip\":{\"title\":\"A\",\"audio_url\":\"https://cdn/x.mp3\"}}"#]);
    assert!(matches!(extract(&html), Err(Error::IncompleteRecord("id"))));
}

#[test]
fn bytes_entry_point_decodes_before_extracting() {
    let html = page(&[
        r#"{\"clip\":{\"id\":\"x1\",\"audio_url\":\"https://cdn/x1.mp3\",\"title\":\"Bytes\"}}"#,
    ]);

    let record = extract_bytes(html.as_bytes()).unwrap();
    assert_eq!(record.title(), Some("Bytes"));
}

#[test]
fn record_nested_deeply_is_not_truncated() {
    // Nested objects close with `}}` well before the record's own end; a
    // shortest-match boundary would cut the record there.
    let html = page(&[concat!(
        r#"{\"clip\":{\"metadata\":{\"history\":{\"a\":1}},"#,
        r#"\"id\":\"x1\",\"audio_url\":\"https://cdn/x1.mp3\"}}"#
    )]);

    let record = extract(&html).unwrap();
    assert_eq!(record.id(), Some("x1"));
    assert_eq!(record.audio_url(), Some("https://cdn/x1.mp3"));
}
