//! Wire protocol and transport for the Skald analysis agent.
//!
//! The remote agent speaks the AG-UI event protocol: a run is started by
//! POSTing a [`RunAgentInput`] to the agent endpoint, and the agent answers
//! with a server-sent event stream of [`AgentEvent`]s describing the run's
//! lifecycle. This crate owns the vocabulary of those events, the outbound
//! request payload, and the HTTP/SSE plumbing. The engine in `skald-core`
//! consumes it exclusively through the [`AgentConnector`] seam.

pub mod connector;
pub mod error;
pub mod event;
pub mod http;
pub mod input;
pub mod sse;

pub use connector::{AgentConnector, EventStream};
pub use error::{ConnectorError, Result};
pub use event::{AgentEvent, WireMessage};
pub use http::HttpAgent;
pub use input::RunAgentInput;
