//! End-to-end extraction tests over synthetic song pages.

use suno_dl::{extract, Error};

/// Wrap escaped payloads in push-fragment script elements, in order.
fn page(payloads: &[&str]) -> String {
    payloads
        .iter()
        .enumerate()
        .map(|(i, payload)| {
            format!("<script>self.__next_f.push([{i},\"{payload}\"])</script>")
        })
        .collect()
}

#[test]
fn end_to_end_scenario() {
    let html = page(&[
        r#"{\"clip\":{\"id\":\"x1\",\"title\":\"Song \",\"audio_url\":\"https://cdn/x1.mp3\",\"metadata\":{\"prompt\":\"$16\",\"tags\":\" pop \"}}}"#,
        r#"16:T2f,Verse one\\nChorus 6:[\"$\",\"div\"]"#,
    ]);

    let record = extract(&html).unwrap();
    assert_eq!(record.title(), Some("Song"));
    assert_eq!(record.metadata_str("tags"), Some("pop"));
    assert_eq!(record.prompt(), Some("Verse one\nChorus"));
}

#[test]
fn record_split_across_fragments_requires_document_order() {
    // The record only reassembles when fragments concatenate in document
    // order; the same fragments reordered leave no parseable record.
    let first = r#"{\"clip\":{\"id\":\"x1\",\"audio_"#;
    let second = r#"url\":\"https://cdn/x1.mp3\"}}"#;

    let ordered = page(&[first, second]);
    let record = extract(&ordered).unwrap();
    assert_eq!(record.audio_url(), Some("https://cdn/x1.mp3"));

    let reordered = page(&[second, first]);
    assert!(extract(&reordered).is_err());
}

#[test]
fn side_channel_fields_fill_only_missing_keys() {
    let html = page(&[
        r#"{\"clip\":{\"id\":\"x1\",\"audio_url\":\"https://cdn/x1.mp3\",\"title\":\"A\"}}"#,
        r#"4:{\"title\":\"B\",\"extra\":\"C\"}"#,
    ]);

    let record = extract(&html).unwrap();
    assert_eq!(record.title(), Some("A"));
    assert_eq!(record.str_field("extra"), Some("C"));
}

#[test]
fn meta_tuple_fragments_enrich_the_record() {
    let html = page(&[
        r#"{\"clip\":{\"id\":\"x1\",\"audio_url\":\"https://cdn/x1.mp3\"}}"#,
        r#"14:[[\"$\",\"meta\",\"2\",{\"name\":\"description\",\"content\":\" A generated song \"}]]"#,
    ]);

    let record = extract(&html).unwrap();
    assert_eq!(record.str_field("description"), Some("A generated song"));
}

#[test]
fn unresolved_placeholder_becomes_empty_string() {
    // No lyrics fragment anywhere: the $16 token must not leak downstream.
    let html = page(&[
        r#"{\"clip\":{\"id\":\"x1\",\"audio_url\":\"https://cdn/x1.mp3\",\"metadata\":{\"prompt\":\"$16\"}}}"#,
    ]);

    let record = extract(&html).unwrap();
    assert_eq!(record.prompt(), Some(""));
}

#[test]
fn inline_prompt_is_left_alone() {
    let html = page(&[
        r#"{\"clip\":{\"id\":\"x1\",\"audio_url\":\"https://cdn/x1.mp3\",\"metadata\":{\"prompt\":\"real lyrics\"}}}"#,
        r#"16:Tff,decoy body 6:[\"$\"]"#,
    ]);

    let record = extract(&html).unwrap();
    assert_eq!(record.prompt(), Some("real lyrics"));
}

#[test]
fn string_values_are_trimmed_throughout() {
    let html = page(&[
        r#"{\"clip\":{\"id\":\" x1 \",\"audio_url\":\" https://cdn/x1.mp3 \",\"title\":\"  Spaced  \"}}"#,
    ]);

    let record = extract(&html).unwrap();
    assert_eq!(record.id(), Some("x1"));
    assert_eq!(record.title(), Some("Spaced"));
    assert_eq!(record.audio_url(), Some("https://cdn/x1.mp3"));
}

#[test]
fn empty_page_is_no_record_found() {
    assert!(matches!(extract(""), Err(Error::NoRecordFound)));
    assert!(matches!(
        extract("<html><body>nothing embedded</body></html>"),
        Err(Error::NoRecordFound)
    ));
}
