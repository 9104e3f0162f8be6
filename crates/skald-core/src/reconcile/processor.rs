//! The processor seam the reconciler pipeline is built from.

use std::collections::HashMap;

use skald_agui::AgentEvent;

use crate::view::RunView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingResult {
    /// The event was consumed; later processors may still look at it.
    Handled,
    /// The event was consumed and nothing further should run.
    HandledAndComplete,
    NotHandled,
}

/// Accumulator state for streamed message text.
///
/// At most one buffer is open at a time, identified by the message id the
/// deltas belong to. Each id owns exactly one slot in `RunView::messages`,
/// materialized lazily on its first content delta, so a start frame with no
/// content never leaves an empty message behind and interleaved ids never
/// contaminate each other's text.
#[derive(Debug, Clone, Default)]
pub struct StreamBuffer {
    open_id: Option<String>,
    slots: HashMap<String, usize>,
}

impl StreamBuffer {
    /// Open the buffer for `id`, discarding the previous buffer's identity.
    /// Content already flushed into the sequence stays there.
    pub fn open(&mut self, id: impl Into<String>) {
        self.open_id = Some(id.into());
    }

    /// Close the open buffer without removing its content.
    pub fn close(&mut self) {
        self.open_id = None;
    }

    /// Forget all slot assignments (the sequence was replaced or cleared).
    pub fn reset(&mut self) {
        self.open_id = None;
        self.slots.clear();
    }

    pub fn is_open_for(&self, id: &str) -> bool {
        self.open_id.as_deref() == Some(id)
    }

    /// The sequence slot owned by `id`, created on first use.
    pub fn slot_for<'m>(&mut self, id: &str, messages: &'m mut Vec<String>) -> &'m mut String {
        let index = match self.slots.get(id) {
            Some(&index) if index < messages.len() => index,
            _ => {
                messages.push(String::new());
                let index = messages.len() - 1;
                self.slots.insert(id.to_string(), index);
                index
            }
        };
        &mut messages[index]
    }
}

/// Mutable state shared by every processor while one event is applied.
pub struct ProcessingContext<'a> {
    pub view: &'a mut RunView,
    pub stream: &'a mut StreamBuffer,
}

/// One reconciliation concern: lifecycle, steps, messages, approval, or
/// snapshot merging. Processors are sorted by `priority` and asked in turn
/// whether they handle an event.
pub trait EventProcessor: Send {
    fn priority(&self) -> usize {
        100
    }

    fn can_handle(&self, event: &AgentEvent) -> bool;

    fn process(&mut self, event: &AgentEvent, ctx: &mut ProcessingContext) -> ProcessingResult;

    fn name(&self) -> &'static str;
}
