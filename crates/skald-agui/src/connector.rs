//! The seam between the engine and the remote event source.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::ConnectorError;
use crate::event::AgentEvent;
use crate::input::RunAgentInput;

/// Ordered stream of events for one run. `Err` items are transport
/// failures; the stream is done once it yields `None`.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent, ConnectorError>> + Send>>;

/// Opens event streams for runs of the remote agent.
///
/// [`crate::HttpAgent`] is the production implementation; tests substitute a
/// channel-backed fake. Each call issues one run request and yields that
/// run's events — the connector holds no run state of its own.
#[async_trait]
pub trait AgentConnector: Send + Sync {
    async fn run(&self, input: RunAgentInput) -> Result<EventStream, ConnectorError>;
}
