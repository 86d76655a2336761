//! ID3 tag writing for downloaded audio.
//!
//! Writes the clip's metadata onto the MP3 via `lofty`: the standard
//! accessor fields plus the Suno-specific extras (catalog number, mood,
//! lyrics, precise BPM, a provenance comment and the cover art).

use std::fs;
use std::path::Path;

use chrono::DateTime;
use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::Accessor;
use lofty::read_from_path;
use lofty::tag::{ItemKey, Tag};
use log::debug;

use crate::error::{Error, Result};
use crate::record::Record;

/// Album and genre labels applied to every download.
const ALBUM: &str = "Suno AI Music";
const GENRE: &str = "SunoAI";

/// Write the clip's tags onto `path`.
///
/// `cover` is embedded as the front-cover picture when readable; an
/// unreadable cover is logged and skipped, not fatal. `bpm` is the
/// estimate from [`crate::tempo::estimate_bpm`].
pub fn write_tags(
    path: &Path,
    record: &Record,
    cover: Option<&Path>,
    bpm: f32,
    page_url: &str,
) -> Result<()> {
    let mut tagged_file = read_from_path(path)
        .map_err(|err| Error::Tagging(format!("failed to read {}: {err}", path.display())))?;

    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let Some(tag) = tagged_file.tag_mut(tag_type) else {
        return Err(Error::Tagging(format!(
            "no writable tag for {}",
            path.display()
        )));
    };

    if let Some(title) = record.title() {
        tag.set_title(title.to_string());
    }
    if let Some(artist) = record.display_name() {
        tag.set_artist(artist.to_string());
    }
    tag.set_album(ALBUM.to_string());
    tag.set_genre(GENRE.to_string());

    if let Some(created_at) = record.created_at() {
        tag.insert_text(ItemKey::RecordingDate, date_part(created_at));
    }
    if let Some(id) = record.id() {
        tag.insert_text(ItemKey::CatalogNumber, id.to_string());
    }
    if let Some(mood) = record.metadata_str("tags") {
        tag.insert_text(ItemKey::Mood, mood.to_string());
    }

    if let Some(prompt) = record.prompt() {
        if !prompt.is_empty() {
            // Prompts occasionally still carry literal \n tokens.
            tag.insert_text(ItemKey::Lyrics, prompt.replace("\\n", "\n"));
        }
    }

    tag.insert_text(ItemKey::Bpm, format!("{bpm:.3}"));
    tag.insert_text(ItemKey::IntegerBpm, format!("{}", bpm.round() as i64));

    let style = record.metadata_str("tags").unwrap_or("N/A");
    let shown_bpm = record.metadata_str("estimated_bpm").unwrap_or("N/A");
    tag.set_comment(format!(
        "Suno URL: {page_url}\nStyle: {style}\nBPM: {shown_bpm}"
    ));

    if let Some(cover_path) = cover {
        match fs::read(cover_path) {
            Ok(bytes) => {
                let picture =
                    Picture::new_unchecked(PictureType::CoverFront, Some(MimeType::Jpeg), None, bytes);
                tag.push_picture(picture);
            }
            Err(err) => debug!("cover art unreadable, skipping: {err}"),
        }
    }

    tag.remove_empty();
    tagged_file
        .save_to_path(path, WriteOptions::default())
        .map_err(|err| Error::Tagging(format!("failed to write {}: {err}", path.display())))?;
    Ok(())
}

/// Date part of a `created_at` timestamp, tolerant of the service changing
/// its precision.
fn date_part(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at).map_or_else(
        |_| {
            created_at
                .split('T')
                .next()
                .unwrap_or(created_at)
                .to_string()
        },
        |parsed| parsed.format("%Y-%m-%d").to_string(),
    )
}
