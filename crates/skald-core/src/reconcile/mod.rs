//! The reconciler: folds run events into the view model.
//!
//! A pure state-transition core — (previous view, next event) → next view —
//! structured as a pipeline of processors, one per reconciliation concern.
//! Everything here is synchronous; each event is processed to completion
//! before the next is looked at.

pub mod pipeline;
pub mod processor;
pub mod processors;

pub use pipeline::EventPipeline;
pub use processor::{EventProcessor, ProcessingContext, ProcessingResult, StreamBuffer};

use skald_agui::AgentEvent;

use crate::view::RunView;
use processors::{
    ApprovalProcessor, LifecycleProcessor, MessageProcessor, SnapshotProcessor, StepProcessor,
};

/// Owns the processor pipeline and the streaming-message accumulator for
/// one session. Not shared between sessions.
pub struct Reconciler {
    pipeline: EventPipeline,
    stream: StreamBuffer,
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            pipeline: EventPipeline::new()
                .add_processor(Box::new(LifecycleProcessor))
                .add_processor(Box::new(ApprovalProcessor))
                .add_processor(Box::new(StepProcessor))
                .add_processor(Box::new(MessageProcessor))
                .add_processor(Box::new(SnapshotProcessor)),
            stream: StreamBuffer::default(),
        }
    }

    /// Fold one event into the view.
    pub fn apply(&mut self, view: &mut RunView, event: &AgentEvent) {
        let mut ctx = ProcessingContext {
            view,
            stream: &mut self.stream,
        };
        self.pipeline.process_event(event, &mut ctx);
    }

    /// Drop accumulator state tied to the previous run.
    pub fn reset(&mut self) {
        self.stream.reset();
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::RunStatus;
    use serde_json::json;

    fn interrupt_payload() -> AgentEvent {
        AgentEvent::Custom {
            name: Some("on_interrupt".to_string()),
            value: Some(json!({
                "chunk_count": 3,
                "total_characters": 4_500,
                "files": ["ch01.txt"],
            })),
        }
    }

    #[test]
    fn pipeline_registers_every_concern() {
        let reconciler = Reconciler::new();
        assert_eq!(reconciler.pipeline.processor_count(), 5);
        assert_eq!(
            reconciler.pipeline.processor_names(),
            [
                "LifecycleProcessor",
                "ApprovalProcessor",
                "StepProcessor",
                "MessageProcessor",
                "SnapshotProcessor",
            ]
        );
    }

    #[test]
    fn finish_racing_a_pending_approval_is_suppressed() {
        let mut reconciler = Reconciler::new();
        let mut view = RunView::default();

        reconciler.apply(&mut view, &AgentEvent::RunStarted { thread_id: None, run_id: None });
        reconciler.apply(&mut view, &interrupt_payload());
        reconciler.apply(&mut view, &AgentEvent::RunFinished);

        assert_eq!(view.status, RunStatus::AwaitingApproval);
        assert!(view.approval.is_some());
    }

    #[test]
    fn finish_after_the_decision_completes_normally() {
        let mut reconciler = Reconciler::new();
        let mut view = RunView::default();

        reconciler.apply(&mut view, &interrupt_payload());
        view.resume_run("r-2");
        reconciler.apply(&mut view, &AgentEvent::RunFinished);

        assert_eq!(view.status, RunStatus::Completed);
        assert!(view.approval.is_none());
    }

    #[test]
    fn unknown_events_are_a_no_op() {
        let mut reconciler = Reconciler::new();
        let mut view = RunView::default();
        let before = view.clone();

        reconciler.apply(&mut view, &AgentEvent::Unknown);

        assert_eq!(view, before);
    }

    #[test]
    fn a_full_run_folds_into_one_coherent_view() {
        let mut reconciler = Reconciler::new();
        let mut view = RunView::default();

        for event in [
            AgentEvent::RunStarted { thread_id: None, run_id: Some("r-1".into()) },
            AgentEvent::StepStarted { step_name: Some("load_files".into()) },
            AgentEvent::StepFinished { step_name: Some("load_files".into()) },
            AgentEvent::TextMessageStart { message_id: Some("m-1".into()) },
            AgentEvent::TextMessageContent {
                message_id: Some("m-1".into()),
                delta: Some("Found 2 manuscripts.".into()),
            },
            AgentEvent::TextMessageEnd { message_id: Some("m-1".into()) },
            AgentEvent::StateSnapshot {
                snapshot: Some(json!({
                    "characters": [{"name": "Ahab", "description": "captain"}],
                    "scenes": [],
                })),
            },
            AgentEvent::RunFinished,
        ] {
            reconciler.apply(&mut view, &event);
        }

        assert_eq!(view.status, RunStatus::Completed);
        assert_eq!(view.run_id.as_deref(), Some("r-1"));
        assert_eq!(view.steps.len(), 1);
        assert_eq!(view.messages, ["Found 2 manuscripts."]);
        assert_eq!(view.result.unwrap().characters[0].name, "Ahab");
    }
}
