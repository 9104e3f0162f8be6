//! Decoding of a server-sent event body into [`AgentEvent`]s.

use eventsource_stream::Eventsource;
use futures_core::Stream;
use futures_util::StreamExt;
use tokio_util::bytes::Bytes;
use tracing::warn;

use crate::connector::EventStream;
use crate::error::ConnectorError;
use crate::event::AgentEvent;

/// Decode a raw SSE byte stream into agent events.
///
/// Each SSE frame's `data` payload is one JSON-encoded event. Empty frames
/// (heartbeats) are dropped silently; frames whose payload does not decode
/// are logged and skipped — an unreadable frame must not kill the run.
/// Transport-level failures surface as `Err` items.
pub fn decode_event_stream<S, E>(byte_stream: S) -> EventStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + 'static,
{
    let events = byte_stream
        .map(|result| result.map_err(|e| std::io::Error::other(e.to_string())))
        .eventsource()
        .filter_map(|frame| async move {
            match frame {
                Ok(frame) => {
                    if frame.data.is_empty() {
                        return None;
                    }
                    match serde_json::from_str::<AgentEvent>(&frame.data) {
                        Ok(event) => Some(Ok(event)),
                        Err(err) => {
                            warn!(target: "agui.sse", %err, "skipping undecodable event frame");
                            None
                        }
                    }
                }
                Err(err) => Some(Err(ConnectorError::Stream(err.to_string()))),
            }
        });

    Box::pin(events)
}
