//! Error types.
//!
//! Besides bad command-line input, only two things can actually fail:
//! reading the page that supplies the elements, and fetching weather. Fetch
//! errors stop at the weather source, which swaps in the fallback reading;
//! they never reach the renderer.

use thiserror::Error;

/// Error during a weather fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("fetch worker went away before reporting")]
    Disconnected,
}

/// Error while loading the element collection from a page
#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read page {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid selector {0}")]
    Selector(String),
}

/// Preset name that matches none of the known presets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown preset '{0}' (expected sunny, cloudy, rainy, stormy or cold)")]
pub struct UnknownPreset(pub String);
