//! Error types for the skald-agui crate.

use thiserror::Error;

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;

#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The agent endpoint answered with a non-success status.
    #[error("agent endpoint returned status {status}")]
    Status { status: reqwest::StatusCode },

    /// The event stream broke mid-run.
    #[error("event stream error: {0}")]
    Stream(String),
}
