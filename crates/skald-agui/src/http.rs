//! HTTP implementation of [`AgentConnector`].

use async_trait::async_trait;
use reqwest::header;
use tracing::debug;

use crate::connector::{AgentConnector, EventStream};
use crate::error::ConnectorError;
use crate::input::RunAgentInput;
use crate::sse::decode_event_stream;

/// Connector that POSTs run requests to an AG-UI HTTP endpoint and decodes
/// the streamed response body.
#[derive(Debug, Clone)]
pub struct HttpAgent {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpAgent {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Reuse a preconfigured client (timeouts, proxies, extra headers).
    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AgentConnector for HttpAgent {
    async fn run(&self, input: RunAgentInput) -> Result<EventStream, ConnectorError> {
        debug!(
            target: "agui.http",
            thread_id = %input.thread_id,
            run_id = %input.run_id,
            resume = input.is_resume(),
            "opening run stream"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::ACCEPT, "text/event-stream")
            .json(&input)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::Status { status });
        }

        Ok(decode_event_stream(response.bytes_stream()))
    }
}
