//! Extraction pipeline.
//!
//! Ties the four core stages together for one page: unify the push-stream
//! fragments, extract the primary record, fold in the side-channel fields,
//! and resolve a deferred lyrics placeholder. Only the record stage can
//! fail; the later stages degrade gracefully.

use log::debug;

use crate::error::Result;
use crate::options::ExtractOptions;
use crate::patterns::PLACEHOLDER_TOKEN;
use crate::record::{self, Record};
use crate::{lyrics, side_channel, stream};

/// Run the full extraction pipeline over one page's HTML.
pub(crate) fn extract_record(html: &str, options: &ExtractOptions) -> Result<Record> {
    let unified = stream::unify(html);
    let mut rec = record::extract(&unified)?;

    let side = side_channel::collect(&unified);
    if !side.is_empty() {
        debug!("merging {} side-channel fields into the record", side.len());
    }
    rec.merge_missing(side);

    resolve_prompt_placeholder(&mut rec, &unified, options);

    rec.ensure_downloadable()?;
    Ok(rec)
}

/// When the prompt is a `$N` chunk reference, replace it with the recovered
/// lyrics body, or with the empty string when recovery fails - the literal
/// token must never leak downstream.
fn resolve_prompt_placeholder(rec: &mut Record, unified: &str, options: &ExtractOptions) {
    let token = match rec.prompt() {
        Some(prompt) if PLACEHOLDER_TOKEN.is_match(prompt) => prompt.to_string(),
        _ => return,
    };

    match lyrics::recover(unified, options) {
        Some(body) => rec.set_prompt(body),
        None => {
            debug!("prompt placeholder {token} not recoverable; clearing prompt");
            rec.set_prompt(String::new());
        }
    }
}
