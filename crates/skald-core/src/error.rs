//! Error types for the skald-core crate.

use skald_agui::ConnectorError;
use thiserror::Error;

/// Failures of the engine itself, as opposed to failures the remote run
/// reports through a `RUN_ERROR` event. Both end up as the view model's
/// `error` status; nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum Error {
    /// Opening the event stream failed before any event arrived.
    #[error("failed to open run stream: {0}")]
    Subscribe(#[source] ConnectorError),

    /// The event stream broke mid-run.
    #[error("run stream failed: {0}")]
    Stream(#[source] ConnectorError),
}
