//! Error types for suno-dl.
//!
//! This module defines the error types returned by extraction and by the
//! download/tagging collaborators.

/// Error type for extraction and download operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No clip record signature was present in the unified stream.
    /// The stream may be empty or the page shape may have changed.
    #[error("no clip record found in page stream")]
    NoRecordFound,

    /// A candidate record substring was found but could not be parsed,
    /// even after control-character cleanup. Carries the parse error from
    /// the first (pre-cleanup) attempt.
    #[error("clip record is unparseable: {0}")]
    MalformedRecord(#[source] serde_json::Error),

    /// The parsed record lacks a field required to drive downloads.
    #[error("clip record is missing required field `{0}`")]
    IncompleteRecord(&'static str),

    /// An HTTP request failed or returned a non-success status.
    #[error("request failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Filesystem failure while writing downloads or the JSON sidecar.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag writing failed.
    #[error("tag write failed: {0}")]
    Tagging(String),

    /// Audio decoding or tempo analysis failed.
    #[error("audio analysis failed: {0}")]
    Audio(String),
}

/// Result type alias for extraction and download operations.
pub type Result<T> = std::result::Result<T, Error>;
