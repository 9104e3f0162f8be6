//! Inbound event vocabulary for a remote analysis run.
//!
//! Events arrive as JSON objects tagged by a `type` field. The set below is
//! closed on our side, but the wire is not: tags we do not recognize decode
//! to [`AgentEvent::Unknown`] and are dropped by the reconciler, and payload
//! fields that fail a type check decode to `None` instead of failing the
//! whole event. The previous view-model value wins over a malformed field.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One event emitted by the remote run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentEvent {
    #[serde(rename_all = "camelCase")]
    RunStarted {
        #[serde(default, deserialize_with = "lenient")]
        thread_id: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        run_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    StepStarted {
        #[serde(default, deserialize_with = "lenient")]
        step_name: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    StepFinished {
        #[serde(default, deserialize_with = "lenient")]
        step_name: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    TextMessageStart {
        #[serde(default, deserialize_with = "lenient")]
        message_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    TextMessageContent {
        #[serde(default, deserialize_with = "lenient")]
        message_id: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        delta: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    TextMessageEnd {
        #[serde(default, deserialize_with = "lenient")]
        message_id: Option<String>,
    },
    MessagesSnapshot {
        #[serde(default, deserialize_with = "lenient")]
        messages: Option<Vec<WireMessage>>,
    },
    StateSnapshot {
        #[serde(default)]
        snapshot: Option<Value>,
    },
    /// Generic custom event, discriminated further by `name`. The engine
    /// only recognizes `on_interrupt`.
    Custom {
        #[serde(default, deserialize_with = "lenient")]
        name: Option<String>,
        #[serde(default)]
        value: Option<Value>,
    },
    RunFinished,
    RunError {
        #[serde(default, deserialize_with = "lenient")]
        message: Option<String>,
    },
    /// Any tag we do not recognize. Reconciled to a no-op.
    #[serde(other)]
    Unknown,
}

/// One message inside a `MESSAGES_SNAPSHOT` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
}

impl WireMessage {
    pub fn is_assistant(&self) -> bool {
        self.role.as_deref() == Some("assistant")
    }
}

/// Deserialize a field into `Option<T>`, mapping a wrong-typed value to
/// `None` instead of an error.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
