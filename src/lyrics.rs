//! Targeted lyrics recovery.
//!
//! When the record's prompt is deferred to a separate text chunk, the
//! lyrics body travels as its own numbered fragment (`16:T<hex>,...`),
//! terminated by the next known fragment (`6:["$"...`). This is a
//! positional heuristic tied to the pipeline's chunk numbering, not a
//! general parser; the two indices live in `ExtractOptions` so they can
//! follow upstream changes.

use log::debug;
use regex::Regex;

use crate::options::ExtractOptions;
use crate::patterns::ESCAPED_NEWLINE;

/// Recover the free-text lyrics body from the unified stream.
///
/// Returns the text between the opening and terminating markers, trimmed,
/// with residual escaped-newline tokens normalized to literal newlines.
/// Returns `None` when the bounding markers are not both present, or when
/// the captured body is empty - the caller treats both as "no lyrics".
#[must_use]
pub fn recover(stream: &str, options: &ExtractOptions) -> Option<String> {
    let pattern = format!(
        r#"(?s){open}:T[0-9a-f]+,(.*?){close}:\["\$""#,
        open = options.lyrics_fragment_index,
        close = options.lyrics_boundary_index,
    );
    let Ok(bounds) = Regex::new(&pattern) else {
        debug!("lyrics marker pattern failed to compile: {pattern}");
        return None;
    };

    let body = bounds.captures(stream)?.get(1)?.as_str().trim();
    if body.is_empty() {
        return None;
    }
    Some(ESCAPED_NEWLINE.replace_all(body, "\n").into_owned())
}
