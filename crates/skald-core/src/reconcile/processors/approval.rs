//! The approval gate: turns an interrupt into a pending human decision.

use skald_agui::AgentEvent;
use tracing::trace;

use crate::reconcile::processor::{EventProcessor, ProcessingContext, ProcessingResult};
use crate::view::{ApprovalPrompt, RunStatus};

const INTERRUPT_EVENT: &str = "on_interrupt";

pub struct ApprovalProcessor;

impl EventProcessor for ApprovalProcessor {
    fn priority(&self) -> usize {
        30
    }

    fn can_handle(&self, event: &AgentEvent) -> bool {
        matches!(event, AgentEvent::Custom { .. })
    }

    fn process(&mut self, event: &AgentEvent, ctx: &mut ProcessingContext) -> ProcessingResult {
        let AgentEvent::Custom { name, value } = event else {
            return ProcessingResult::NotHandled;
        };

        if name.as_deref() != Some(INTERRUPT_EVENT) {
            return ProcessingResult::Handled;
        }

        let prompt = value
            .as_ref()
            .and_then(ApprovalPrompt::from_interrupt_payload);
        match prompt {
            Some(prompt) => {
                ctx.view.approval = Some(prompt);
                ctx.view.status = RunStatus::AwaitingApproval;
            }
            None => {
                // A malformed human-in-the-loop signal must not freeze or
                // corrupt the run; treat it as "no interrupt happened".
                trace!(target: "core.reconcile", "ignoring malformed interrupt payload");
            }
        }
        ProcessingResult::Handled
    }

    fn name(&self) -> &'static str {
        "ApprovalProcessor"
    }
}
