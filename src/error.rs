//! Typed failures that callers are expected to match on.
//!
//! Everything else propagates as [`anyhow::Error`].

use thiserror::Error;

/// A required field was absent from a station record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("missing required field `{0}`")]
    Missing(&'static str),
}

/// Why a fetch produced no station data this cycle.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid station payload: {0}")]
    Decode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("station list contained no usable stations")]
    Empty,
}

impl FetchFailure {
    /// Short machine-friendly tag used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchFailure::Status(_) => "status",
            FetchFailure::Transport(_) => "transport",
            FetchFailure::Decode(_) => "decode",
            FetchFailure::InvalidUrl(_) => "invalid_url",
            FetchFailure::Empty => "empty",
        }
    }
}
