//! Run-state reconciliation engine for the Skald analysis agent.
//!
//! The remote agent analyzes manuscript text in chunks, pausing mid-run for
//! a human decision before the expensive analysis phase. This crate owns
//! the client-side state for that conversation: it opens runs through a
//! [`skald_agui::AgentConnector`], consumes the resulting event stream one
//! event at a time, and folds everything into a single [`RunView`] —
//! resolving the race between a terminal "finished" signal and a pending
//! approval, and keeping session identity stable across resumes.
//!
//! Entry point: [`AnalysisRunner`]. Presentation of the view is a consumer
//! concern and lives elsewhere.

pub mod error;
pub mod reconcile;
pub mod runner;
pub mod session;
pub mod subscription;
pub mod view;

pub use error::Error;
pub use reconcile::Reconciler;
pub use runner::AnalysisRunner;
pub use session::{RunId, RunSession, ThreadId};
pub use subscription::SubscriptionManager;
pub use view::{
    AnalysisResult, ApprovalPrompt, CharacterProfile, RunStatus, RunView, SceneSummary,
    StepProgress, StepStatus,
};
