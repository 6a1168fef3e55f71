//! Error types for storefront chrome

use thiserror::Error;

/// Errors surfaced by configuration loading, trace replay and menu resolution
#[derive(Debug, Error)]
pub enum ChromeError {
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid trace: {0}")]
    InvalidTrace(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failures reported by a media element when asked to begin playback.
///
/// These never escape the hero controller; they are logged and kept for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("Autoplay rejected by platform: {0}")]
    AutoplayRejected(String),

    #[error("Media element is not mounted")]
    NotMounted,
}
