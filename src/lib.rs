//! # suno-dl
//!
//! Suno AI song downloader library.
//!
//! Suno song pages embed the clip's metadata inside a server-rendered
//! flight stream - escaped text chunks pushed through script elements -
//! rather than a clean API payload. This library reassembles that stream,
//! recovers the clip record from it, and provides the collaborators the
//! CLI needs to download and ID3-tag the referenced media.
//!
//! ## Quick Start
//!
//! ```rust
//! use suno_dl::extract;
//!
//! let html = r#"<script>self.__next_f.push([1,"{\"clip\":{\"id\":\"x1\",\"title\":\"Song\",\"audio_url\":\"https://cdn/x1.mp3\"}}"])</script>"#;
//!
//! let record = extract(html)?;
//! assert_eq!(record.title(), Some("Song"));
//! # Ok::<(), suno_dl::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! - **Stream unification**: push fragments concatenated in document order
//!   and unescaped into one text blob
//! - **Record extraction**: the `{"clip":{...}}` candidate located by a
//!   depth-tracking scanner and parsed, with one control-character-stripped
//!   retry
//! - **Side-channel merge**: document head tags and stray object fragments
//!   folded in without overwriting record fields
//! - **Lyrics recovery**: deferred `$N` prompt placeholders resolved from
//!   the lyrics text chunk

mod error;
mod extract;
mod options;
mod patterns;

/// Flight-stream unescaping and fragment concatenation.
pub mod stream;

/// Clip record location, parsing and normalization.
pub mod record;

/// Best-effort side-channel field collection.
pub mod side_channel;

/// Targeted lyrics recovery for deferred prompt placeholders.
pub mod lyrics;

/// Character decoding for fetched page bodies.
pub mod encoding;

/// Blocking HTTP fetch and media download.
pub mod fetch;

/// Output file naming and layout.
pub mod files;

/// Tempo estimation over downloaded audio.
pub mod tempo;

/// ID3 tag writing for downloaded audio.
pub mod tags;

// Public API - re-exports
pub use error::{Error, Result};
pub use options::ExtractOptions;
pub use record::Record;

/// Extracts the clip record from a song page using default options.
///
/// # Arguments
///
/// * `html` - The page HTML as a string slice
///
/// # Returns
///
/// Returns `Ok(Record)` on success. Returns `Error::NoRecordFound` when
/// the page carries no record, or `Error::MalformedRecord` when the
/// candidate cannot be parsed.
pub fn extract(html: &str) -> Result<Record> {
    extract_with_options(html, &ExtractOptions::default())
}

/// Extracts the clip record from a song page with custom options.
///
/// # Example
///
/// ```rust
/// use suno_dl::{extract_with_options, ExtractOptions};
///
/// let html = r#"<script>self.__next_f.push([1,"{\"clip\":{\"id\":\"x1\",\"audio_url\":\"https://cdn/x1.mp3\"}}"])</script>"#;
/// let options = ExtractOptions {
///     url: Some("https://suno.com/song/x1".to_string()),
///     ..ExtractOptions::default()
/// };
/// let record = extract_with_options(html, &options)?;
/// # Ok::<(), suno_dl::Error>(())
/// ```
pub fn extract_with_options(html: &str, options: &ExtractOptions) -> Result<Record> {
    extract::extract_record(html, options)
}

/// Extracts the clip record from raw page bytes with charset detection.
///
/// Sniffs the charset from the document head, converts to UTF-8 and runs
/// the standard extraction. Invalid characters are replaced rather than
/// treated as errors.
pub fn extract_bytes(html: &[u8]) -> Result<Record> {
    let html_str = encoding::decode_page(html);
    extract(&html_str)
}

/// Extracts the clip record from raw page bytes with custom options.
pub fn extract_bytes_with_options(html: &[u8], options: &ExtractOptions) -> Result<Record> {
    let html_str = encoding::decode_page(html);
    extract_with_options(&html_str, options)
}
