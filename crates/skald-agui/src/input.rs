//! Outbound run-request payload.

use serde::Serialize;
use serde_json::Value;

/// Body POSTed to the agent endpoint to start or resume a run.
///
/// The message/tool/context/state slots are part of the protocol but always
/// empty for this agent; the only variable parts are the session identifiers
/// and, on resume, the forwarded resume command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunAgentInput {
    pub thread_id: String,
    pub run_id: String,
    pub messages: Vec<Value>,
    pub tools: Vec<Value>,
    pub context: Vec<Value>,
    pub state: Value,
    pub forwarded_props: ForwardedProps,
}

impl RunAgentInput {
    pub fn new(thread_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
            messages: Vec::new(),
            tools: Vec::new(),
            context: Vec::new(),
            state: Value::Object(serde_json::Map::new()),
            forwarded_props: ForwardedProps::default(),
        }
    }

    /// Attach the resume command carrying the human decision. This is the
    /// only channel by which the decision reaches the remote run.
    pub fn with_resume(mut self, approved: bool) -> Self {
        self.forwarded_props.command = Some(Command {
            resume: ResumeDirective { approved },
        });
        self
    }

    pub fn is_resume(&self) -> bool {
        self.forwarded_props.command.is_some()
    }

    pub fn resume_decision(&self) -> Option<bool> {
        self.forwarded_props
            .command
            .as_ref()
            .map(|command| command.resume.approved)
    }
}

/// Serializes as `{}` on an initial run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ForwardedProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Command {
    pub resume: ResumeDirective,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeDirective {
    pub approved: bool,
}
