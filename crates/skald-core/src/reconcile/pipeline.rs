use skald_agui::AgentEvent;
use tracing::trace;

use super::processor::{EventProcessor, ProcessingContext, ProcessingResult};

/// Ordered chain of [`EventProcessor`]s. Each event is offered to every
/// processor that claims it, in priority order, until one reports
/// `HandledAndComplete`.
pub struct EventPipeline {
    processors: Vec<Box<dyn EventProcessor>>,
}

impl EventPipeline {
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    pub fn add_processor(mut self, processor: Box<dyn EventProcessor>) -> Self {
        self.processors.push(processor);
        self.processors.sort_by_key(|p| p.priority());
        self
    }

    pub fn process_event(&mut self, event: &AgentEvent, ctx: &mut ProcessingContext) {
        let mut claimed = false;
        for processor in &mut self.processors {
            if !processor.can_handle(event) {
                continue;
            }

            match processor.process(event, ctx) {
                ProcessingResult::Handled => claimed = true,
                ProcessingResult::NotHandled => {}
                ProcessingResult::HandledAndComplete => return,
            }
        }

        if !claimed {
            trace!(target: "core.reconcile", ?event, "event not claimed by any processor");
        }
    }

    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    pub fn processor_names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }
}

impl Default for EventPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPipeline")
            .field("processor_count", &self.processor_count())
            .field("processors", &self.processor_names())
            .finish()
    }
}
