//! Field-by-field merge of remote state snapshots into the analysis result.

use serde_json::{Map, Value};
use skald_agui::AgentEvent;

use crate::reconcile::processor::{EventProcessor, ProcessingContext, ProcessingResult};
use crate::reconcile::processors::step::canonical_step_name;
use crate::view::{AnalysisResult, CharacterProfile, SceneSummary, StepStatus};

pub struct SnapshotProcessor;

impl EventProcessor for SnapshotProcessor {
    fn priority(&self) -> usize {
        60
    }

    fn can_handle(&self, event: &AgentEvent) -> bool {
        matches!(event, AgentEvent::StateSnapshot { .. })
    }

    fn process(&mut self, event: &AgentEvent, ctx: &mut ProcessingContext) -> ProcessingResult {
        let AgentEvent::StateSnapshot { snapshot } = event else {
            return ProcessingResult::NotHandled;
        };
        let Some(Value::Object(snapshot)) = snapshot else {
            return ProcessingResult::Handled;
        };

        merge_result(ctx.view.result.get_or_insert_with(AnalysisResult::default), snapshot);
        mirror_steps(ctx, snapshot);

        // The approval prompt and the awaiting-approval status are owned by
        // the approval gate alone; this path never touches them.
        ProcessingResult::Handled
    }

    fn name(&self) -> &'static str {
        "SnapshotProcessor"
    }
}

/// Overwrite each result field that arrives with the expected shape; leave
/// the previous value for anything absent or mistyped. A present-but-empty
/// list is a legitimate overwrite.
fn merge_result(result: &mut AnalysisResult, snapshot: &Map<String, Value>) {
    if let Some(characters) = decode_list::<CharacterProfile>(snapshot.get("characters")) {
        result.characters = characters;
    }
    if let Some(scenes) = decode_list::<SceneSummary>(snapshot.get("scenes")) {
        result.scenes = scenes;
    }
    if let Some(generated_at) = snapshot
        .get("aggregated")
        .and_then(Value::as_object)
        .and_then(|aggregated| aggregated.get("generated_at"))
        .and_then(Value::as_str)
    {
        result.generated_at = Some(generated_at.to_string());
    }
    if let Some(output_path) = snapshot.get("output_path").and_then(Value::as_str) {
        result.output_path = Some(output_path.to_string());
    }
}

/// The remote graph mirrors its step table into every snapshot; fold it
/// through the same upsert rules the step events use.
fn mirror_steps(ctx: &mut ProcessingContext, snapshot: &Map<String, Value>) {
    let Some(steps) = snapshot.get("steps").and_then(Value::as_array) else {
        return;
    };
    for entry in steps {
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            continue;
        };
        let status = match entry.get("status").and_then(Value::as_str) {
            Some("running") => StepStatus::Running,
            Some("completed") => StepStatus::Completed,
            _ => continue,
        };
        ctx.view.upsert_step(canonical_step_name(name), status);
    }
}

fn decode_list<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> Option<Vec<T>> {
    value
        .filter(|value| value.is_array())
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}
