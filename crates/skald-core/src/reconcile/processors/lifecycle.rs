//! Run lifecycle transitions, including the finish/approval race fix.

use skald_agui::AgentEvent;
use tracing::debug;

use crate::reconcile::processor::{EventProcessor, ProcessingContext, ProcessingResult};
use crate::view::RunStatus;

pub struct LifecycleProcessor;

impl EventProcessor for LifecycleProcessor {
    fn priority(&self) -> usize {
        10
    }

    fn can_handle(&self, event: &AgentEvent) -> bool {
        matches!(
            event,
            AgentEvent::RunStarted { .. } | AgentEvent::RunFinished | AgentEvent::RunError { .. }
        )
    }

    fn process(&mut self, event: &AgentEvent, ctx: &mut ProcessingContext) -> ProcessingResult {
        match event {
            AgentEvent::RunStarted { run_id, .. } => {
                ctx.view.status = RunStatus::Running;
                if let Some(run_id) = run_id {
                    ctx.view.run_id = Some(run_id.clone());
                }
                ProcessingResult::Handled
            }
            AgentEvent::RunFinished => {
                // The remote run may emit its terminal signal before the
                // human decision is resolved. An unresolved approval wins:
                // only an explicit resume advances past it.
                if ctx.view.status == RunStatus::AwaitingApproval
                    && ctx.view.has_pending_approval()
                {
                    debug!(
                        target: "core.reconcile",
                        "finish signal suppressed while approval is pending"
                    );
                    ProcessingResult::Handled
                } else {
                    ctx.view.complete();
                    ProcessingResult::HandledAndComplete
                }
            }
            AgentEvent::RunError { message } => {
                let message = message.clone().unwrap_or_else(|| "run failed".to_string());
                ctx.view.fail(message);
                ProcessingResult::HandledAndComplete
            }
            _ => ProcessingResult::NotHandled,
        }
    }

    fn name(&self) -> &'static str {
        "LifecycleProcessor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::processor::StreamBuffer;
    use crate::view::{ApprovalPrompt, RunView};

    fn apply(view: &mut RunView, event: &AgentEvent) -> ProcessingResult {
        let mut stream = StreamBuffer::default();
        let mut ctx = ProcessingContext { view, stream: &mut stream };
        LifecycleProcessor.process(event, &mut ctx)
    }

    #[test]
    fn run_started_sets_running_and_mirrors_run_id() {
        let mut view = RunView::default();
        apply(
            &mut view,
            &AgentEvent::RunStarted {
                thread_id: None,
                run_id: Some("r-9".to_string()),
            },
        );
        assert_eq!(view.status, RunStatus::Running);
        assert_eq!(view.run_id.as_deref(), Some("r-9"));
    }

    #[test]
    fn run_finished_completes_a_plain_run() {
        let mut view = RunView::default();
        view.status = RunStatus::Running;
        let result = apply(&mut view, &AgentEvent::RunFinished);
        assert_eq!(result, ProcessingResult::HandledAndComplete);
        assert_eq!(view.status, RunStatus::Completed);
    }

    #[test]
    fn run_finished_is_suppressed_while_approval_is_pending() {
        let mut view = RunView::default();
        view.status = RunStatus::AwaitingApproval;
        view.approval = Some(ApprovalPrompt {
            chunk_count: 2,
            total_characters: 40,
            files: vec!["a.txt".to_string()],
        });

        let result = apply(&mut view, &AgentEvent::RunFinished);

        assert_eq!(result, ProcessingResult::Handled);
        assert_eq!(view.status, RunStatus::AwaitingApproval);
        assert!(view.approval.is_some());
    }

    #[test]
    fn run_error_records_the_message_and_clears_approval() {
        let mut view = RunView::default();
        view.status = RunStatus::AwaitingApproval;
        view.approval = Some(ApprovalPrompt {
            chunk_count: 1,
            total_characters: 1,
            files: vec![],
        });

        apply(
            &mut view,
            &AgentEvent::RunError {
                message: Some("model quota exceeded".to_string()),
            },
        );

        assert_eq!(view.status, RunStatus::Error);
        assert_eq!(view.error.as_deref(), Some("model quota exceeded"));
        assert!(view.approval.is_none());
    }

    #[test]
    fn run_error_without_message_uses_a_fallback() {
        let mut view = RunView::default();
        apply(&mut view, &AgentEvent::RunError { message: None });
        assert_eq!(view.error.as_deref(), Some("run failed"));
    }
}
