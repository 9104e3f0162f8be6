//! Streaming message assembly.
//!
//! Deltas append to the sequence slot owned by their message id; a full
//! messages snapshot replaces the sequence wholesale.

use skald_agui::AgentEvent;

use crate::reconcile::processor::{EventProcessor, ProcessingContext, ProcessingResult};

pub struct MessageProcessor;

impl EventProcessor for MessageProcessor {
    fn priority(&self) -> usize {
        50
    }

    fn can_handle(&self, event: &AgentEvent) -> bool {
        matches!(
            event,
            AgentEvent::TextMessageStart { .. }
                | AgentEvent::TextMessageContent { .. }
                | AgentEvent::TextMessageEnd { .. }
                | AgentEvent::MessagesSnapshot { .. }
        )
    }

    fn process(&mut self, event: &AgentEvent, ctx: &mut ProcessingContext) -> ProcessingResult {
        match event {
            AgentEvent::TextMessageStart { message_id } => {
                if let Some(id) = message_id {
                    ctx.stream.open(id.clone());
                }
                ProcessingResult::Handled
            }
            AgentEvent::TextMessageContent { message_id, delta } => {
                let Some(id) = message_id else {
                    return ProcessingResult::Handled;
                };
                if !ctx.stream.is_open_for(id) {
                    ctx.stream.open(id.clone());
                }
                let slot = ctx.stream.slot_for(id, &mut ctx.view.messages);
                slot.push_str(delta.as_deref().unwrap_or(""));
                ProcessingResult::Handled
            }
            AgentEvent::TextMessageEnd { .. } => {
                ctx.stream.close();
                ProcessingResult::Handled
            }
            AgentEvent::MessagesSnapshot { messages } => {
                // Full replacement: only assistant-authored messages, in
                // snapshot order, overriding whatever streaming assembled.
                if let Some(messages) = messages {
                    ctx.view.messages = messages
                        .iter()
                        .filter(|message| message.is_assistant())
                        .map(|message| message.content.clone().unwrap_or_default())
                        .collect();
                    ctx.stream.reset();
                }
                ProcessingResult::Handled
            }
            _ => ProcessingResult::NotHandled,
        }
    }

    fn name(&self) -> &'static str {
        "MessageProcessor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::processor::StreamBuffer;
    use crate::view::RunView;
    use proptest::prelude::*;
    use skald_agui::WireMessage;

    struct Harness {
        view: RunView,
        stream: StreamBuffer,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                view: RunView::default(),
                stream: StreamBuffer::default(),
            }
        }

        fn apply(&mut self, event: &AgentEvent) {
            let mut ctx = ProcessingContext {
                view: &mut self.view,
                stream: &mut self.stream,
            };
            MessageProcessor.process(event, &mut ctx);
        }
    }

    fn start(id: &str) -> AgentEvent {
        AgentEvent::TextMessageStart {
            message_id: Some(id.to_string()),
        }
    }

    fn content(id: &str, delta: &str) -> AgentEvent {
        AgentEvent::TextMessageContent {
            message_id: Some(id.to_string()),
            delta: Some(delta.to_string()),
        }
    }

    fn end() -> AgentEvent {
        AgentEvent::TextMessageEnd { message_id: None }
    }

    fn assistant(id: &str, content: &str) -> WireMessage {
        WireMessage {
            id: Some(id.to_string()),
            role: Some("assistant".to_string()),
            content: Some(content.to_string()),
        }
    }

    #[test]
    fn start_then_deltas_accumulate_into_one_message() {
        let mut h = Harness::new();
        h.apply(&start("m-1"));
        h.apply(&content("m-1", "Once "));
        h.apply(&content("m-1", "upon"));
        h.apply(&end());

        assert_eq!(h.view.messages, ["Once upon"]);
    }

    #[test]
    fn start_without_content_leaves_no_empty_message() {
        let mut h = Harness::new();
        h.apply(&start("m-1"));
        h.apply(&end());
        assert!(h.view.messages.is_empty());
    }

    #[test]
    fn interleaved_ids_keep_their_own_entries() {
        let mut h = Harness::new();
        h.apply(&content("m-1", "first"));
        h.apply(&content("m-2", "second"));
        h.apply(&content("m-1", " again"));

        assert_eq!(h.view.messages, ["first again", "second"]);
    }

    #[test]
    fn content_without_start_still_accumulates() {
        let mut h = Harness::new();
        h.apply(&content("m-2", "no start frame"));
        assert_eq!(h.view.messages, ["no start frame"]);
    }

    #[test]
    fn snapshot_replaces_assembled_messages() {
        let mut h = Harness::new();
        h.apply(&content("m-1", "streamed"));
        h.apply(&AgentEvent::MessagesSnapshot {
            messages: Some(vec![
                assistant("m-1", "final one"),
                WireMessage {
                    id: Some("u-1".to_string()),
                    role: Some("user".to_string()),
                    content: Some("ignored".to_string()),
                },
                assistant("m-2", "final two"),
            ]),
        });

        assert_eq!(h.view.messages, ["final one", "final two"]);
    }

    #[test]
    fn snapshot_with_absent_messages_changes_nothing() {
        let mut h = Harness::new();
        h.apply(&content("m-1", "kept"));
        h.apply(&AgentEvent::MessagesSnapshot { messages: None });
        assert_eq!(h.view.messages, ["kept"]);
    }

    #[test]
    fn deltas_after_snapshot_open_a_fresh_entry() {
        let mut h = Harness::new();
        h.apply(&content("m-1", "old"));
        h.apply(&AgentEvent::MessagesSnapshot {
            messages: Some(vec![assistant("m-1", "settled")]),
        });
        h.apply(&content("m-1", "again"));

        assert_eq!(h.view.messages, ["settled", "again"]);
    }

    proptest! {
        /// Interleaving deltas across two ids yields exactly one entry per
        /// distinct id, each the concatenation of its own deltas in
        /// arrival order.
        #[test]
        fn no_cross_contamination_between_ids(
            picks in proptest::collection::vec(any::<bool>(), 1..40)
        ) {
            let mut h = Harness::new();
            let mut expected: Vec<(&str, String)> = Vec::new();

            for (i, pick_a) in picks.iter().enumerate() {
                let id = if *pick_a { "m-a" } else { "m-b" };
                let delta = format!("d{i};");
                match expected.iter_mut().find(|(slot_id, _)| *slot_id == id) {
                    Some((_, text)) => text.push_str(&delta),
                    None => expected.push((id, delta.clone())),
                }
                h.apply(&content(id, &delta));
            }

            let expected_texts: Vec<String> =
                expected.into_iter().map(|(_, text)| text).collect();
            prop_assert_eq!(&h.view.messages, &expected_texts);
        }
    }
}
