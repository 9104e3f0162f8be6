//! Step progress tracking with canonical naming.

use skald_agui::AgentEvent;

use crate::reconcile::processor::{EventProcessor, ProcessingContext, ProcessingResult};
use crate::view::StepStatus;

/// Collapse backend phase names onto the step names consumers display.
/// A pure lookup: names without a mapping pass through unchanged.
pub fn canonical_step_name(name: &str) -> &str {
    match name {
        // The chunk fan-out phase reports per-chunk, but it is one step to
        // the viewer.
        "analyze_chunks" => "analyze",
        other => other,
    }
}

pub struct StepProcessor;

impl EventProcessor for StepProcessor {
    fn priority(&self) -> usize {
        40
    }

    fn can_handle(&self, event: &AgentEvent) -> bool {
        matches!(
            event,
            AgentEvent::StepStarted { .. } | AgentEvent::StepFinished { .. }
        )
    }

    fn process(&mut self, event: &AgentEvent, ctx: &mut ProcessingContext) -> ProcessingResult {
        match event {
            AgentEvent::StepStarted {
                step_name: Some(name),
            } => {
                ctx.view
                    .upsert_step(canonical_step_name(name), StepStatus::Running);
                ProcessingResult::Handled
            }
            AgentEvent::StepFinished {
                step_name: Some(name),
            } => {
                ctx.view
                    .upsert_step(canonical_step_name(name), StepStatus::Completed);
                ProcessingResult::Handled
            }
            // A step event without a usable name carries nothing to track.
            AgentEvent::StepStarted { step_name: None }
            | AgentEvent::StepFinished { step_name: None } => ProcessingResult::Handled,
            _ => ProcessingResult::NotHandled,
        }
    }

    fn name(&self) -> &'static str {
        "StepProcessor"
    }
}
