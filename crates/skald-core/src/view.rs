//! The view model the engine folds run events into.
//!
//! `RunView` is the single consistent picture handed to external consumers
//! (UI layers, out of scope here). It is mutated only by the reconciler and
//! the runner's own lifecycle helpers, one event at a time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::Display;

/// Authoritative phase of a run. Exactly one value at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    AwaitingApproval,
    Completed,
    Error,
}

impl RunStatus {
    /// Terminal for the current run; only a new `start`/`resume` leaves it.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Error)
    }

    pub fn is_busy(self) -> bool {
        matches!(self, RunStatus::Running | RunStatus::AwaitingApproval)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Running,
    Completed,
}

/// Progress of one named pipeline step on the remote run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepProgress {
    pub name: String,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSummary {
    pub title: String,
    pub summary: String,
}

/// Aggregated analysis output, merged incrementally from state snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub characters: Vec<CharacterProfile>,
    pub scenes: Vec<SceneSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

/// A pending human decision blocking the remote run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalPrompt {
    pub chunk_count: u64,
    pub total_characters: u64,
    pub files: Vec<String>,
}

impl ApprovalPrompt {
    /// Normalize an `on_interrupt` payload into a prompt.
    ///
    /// The payload may arrive as a JSON string needing a second parse, and
    /// the agent has emitted both snake_case and camelCase spellings of the
    /// same fields; both are accepted. Returns `None` for anything that is
    /// not (or does not parse to) an object — a malformed interrupt is
    /// treated as if no interrupt happened.
    pub fn from_interrupt_payload(value: &Value) -> Option<Self> {
        let parsed;
        let object = match value {
            Value::String(raw) => {
                parsed = serde_json::from_str::<Value>(raw).ok()?;
                parsed.as_object()?
            }
            other => other.as_object()?,
        };

        let files = object
            .get("files")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            chunk_count: read_count(object, "chunk_count", "chunkCount"),
            total_characters: read_count(object, "total_characters", "totalCharacters"),
            files,
        })
    }
}

fn read_count(object: &serde_json::Map<String, Value>, snake: &str, camel: &str) -> u64 {
    object
        .get(snake)
        .or_else(|| object.get(camel))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// The complete reconciled view of the current run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunView {
    pub status: RunStatus,
    pub steps: Vec<StepProgress>,
    pub messages: Vec<String>,
    pub result: Option<AnalysisResult>,
    pub approval: Option<ApprovalPrompt>,
    pub error: Option<String>,
    pub thread_id: Option<String>,
    pub run_id: Option<String>,
}

impl RunView {
    /// Reset every transient field for a fresh run under new identifiers.
    pub fn begin_run(&mut self, thread_id: &str, run_id: &str) {
        *self = Self {
            status: RunStatus::Running,
            thread_id: Some(thread_id.to_string()),
            run_id: Some(run_id.to_string()),
            ..Self::default()
        };
    }

    /// Carry the accumulated view into a resumed attempt: the pending
    /// prompt is consumed, everything else streams on top of what we have.
    pub fn resume_run(&mut self, run_id: &str) {
        self.status = RunStatus::Running;
        self.approval = None;
        self.error = None;
        self.run_id = Some(run_id.to_string());
    }

    pub fn complete(&mut self) {
        self.status = RunStatus::Completed;
        self.approval = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = RunStatus::Error;
        self.error = Some(message.into());
        self.approval = None;
    }

    /// Upsert a step by name. Insertion order is the order steps were first
    /// seen; a step never regresses from `Completed` back to `Running`.
    pub fn upsert_step(&mut self, name: &str, status: StepStatus) {
        if let Some(step) = self.steps.iter_mut().find(|step| step.name == name) {
            if step.status == StepStatus::Completed && status == StepStatus::Running {
                return;
            }
            step.status = status;
        } else {
            self.steps.push(StepProgress {
                name: name.to_string(),
                status,
            });
        }
    }

    pub fn has_pending_approval(&self) -> bool {
        self.approval.is_some()
    }
}
