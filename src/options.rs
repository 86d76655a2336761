//! Configuration options for record extraction.
//!
//! The `ExtractOptions` struct carries the per-page context and the
//! pipeline-specific constants that may drift when the upstream service
//! changes its chunk emission order.

/// Configuration options for record extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use suno_dl::ExtractOptions;
///
/// let options = ExtractOptions {
///     url: Some("https://suno.com/song/abc".to_string()),
///     ..ExtractOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Source URL of the page, recorded alongside the extracted record
    /// (e.g. in the JSON sidecar and the tag comment).
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// Numeric index of the text fragment carrying the lyrics body.
    ///
    /// The rendering pipeline numbers its chunks; lyrics currently arrive
    /// as fragment `16:T<hex>,...`. This is an artifact of the emission
    /// order, not intrinsic structure, so it is configurable.
    ///
    /// Default: `16`
    pub lyrics_fragment_index: u32,

    /// Numeric index of the reference-array fragment that terminates the
    /// lyrics body (`6:["$"...`).
    ///
    /// Default: `6`
    pub lyrics_boundary_index: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            url: None,
            lyrics_fragment_index: 16,
            lyrics_boundary_index: 6,
        }
    }
}
