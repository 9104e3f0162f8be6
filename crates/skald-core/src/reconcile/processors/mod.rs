//! The reconciliation concerns, one processor each.

pub mod approval;
pub mod lifecycle;
pub mod message;
pub mod snapshot;
pub mod step;

pub use approval::ApprovalProcessor;
pub use lifecycle::LifecycleProcessor;
pub use message::MessageProcessor;
pub use snapshot::SnapshotProcessor;
pub use step::{StepProcessor, canonical_step_name};
