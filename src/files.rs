//! Output file naming and layout.
//!
//! Downloads land under `<out_dir>/<display name>/`, with one base name
//! shared by the JSON sidecar and every media file. Names are sanitized
//! for the current platform and additionally stripped of characters no
//! platform accepts, so a library synced across machines stays portable.

use std::path::{Path, PathBuf};

use crate::patterns::RESERVED_FILENAME_CHARS;

/// Replace characters the current OS refuses in file names with `_`.
#[must_use]
pub fn clean_component(name: &str) -> String {
    if cfg!(windows) {
        RESERVED_FILENAME_CHARS.replace_all(name, "_").into_owned()
    } else if cfg!(target_os = "macos") {
        name.replace(['\\', '/', ':'], "_")
    } else {
        name.replace(['\\', '/', '\0'], "_")
    }
}

/// Build the shared base name: `"{display} - {title} {id-...}"`, cleaned
/// for the platform, with newlines and universally-reserved characters
/// removed outright.
#[must_use]
pub fn base_name(display_name: &str, title: &str, id: &str) -> String {
    let raw = format!("{display_name} - {title} {{id-{id}}}");
    let cleaned = clean_component(&raw).replace(['\n', '\r'], "");
    RESERVED_FILENAME_CHARS.replace_all(&cleaned, "").into_owned()
}

/// Resolved output paths for one clip.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    dir: PathBuf,
    base: String,
}

impl OutputPaths {
    #[must_use]
    pub fn new(out_dir: &Path, display_name: &str, title: &str, id: &str) -> Self {
        Self {
            dir: out_dir.join(clean_component(display_name)),
            base: base_name(display_name, title, id),
        }
    }

    /// The clip's download directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn with_ext(&self, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{ext}", self.base))
    }

    #[must_use]
    pub fn json(&self) -> PathBuf {
        self.with_ext("json")
    }

    #[must_use]
    pub fn audio(&self) -> PathBuf {
        self.with_ext("mp3")
    }

    #[must_use]
    pub fn video(&self) -> PathBuf {
        self.with_ext("mp4")
    }

    #[must_use]
    pub fn image(&self) -> PathBuf {
        self.with_ext("jpeg")
    }

    /// Path for the decoded flight-stream dump (`--save-response`).
    #[must_use]
    pub fn response(&self) -> PathBuf {
        self.dir.join(format!("{}-response.txt", self.base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_component_replaces_path_separators() {
        let cleaned = clean_component("AC/DC: Live");
        assert!(!cleaned.contains('/'));
    }

    #[test]
    fn base_name_strips_reserved_characters_and_newlines() {
        let base = base_name("Artist|Name", "Song\nTitle?", "x1");
        assert!(!base.contains('|'));
        assert!(!base.contains('?'));
        assert!(!base.contains('\n'));
        assert!(base.contains("id-x1"));
    }

    #[test]
    fn output_paths_share_one_base() {
        let paths = OutputPaths::new(Path::new("downloads"), "Artist", "Song", "x1");
        assert_eq!(paths.dir(), Path::new("downloads/Artist"));
        assert_eq!(paths.audio(), Path::new("downloads/Artist/Artist - Song {id-x1}.mp3"));
        assert_eq!(paths.json(), Path::new("downloads/Artist/Artist - Song {id-x1}.json"));
        assert_eq!(
            paths.response(),
            Path::new("downloads/Artist/Artist - Song {id-x1}-response.txt")
        );
    }
}
