//! The public action surface: start, resume, reset.
//!
//! `AnalysisRunner` opens a session, attaches one subscription to the remote
//! event source, and feeds every event through the reconciler. Consumers
//! observe effects only through the published view model; none of the
//! actions block the caller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::StreamExt;
use skald_agui::{AgentConnector, AgentEvent, HttpAgent, RunAgentInput};
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::reconcile::Reconciler;
use crate::session::RunSession;
use crate::subscription::SubscriptionManager;
use crate::view::RunView;

/// Client-side engine for one remote analysis conversation.
///
/// Cloning is cheap and clones share the same session and view.
#[derive(Clone)]
pub struct AnalysisRunner {
    connector: Arc<dyn AgentConnector>,
    inner: Arc<RunnerInner>,
}

struct RunnerInner {
    state: Mutex<EngineState>,
    watch_tx: watch::Sender<RunView>,
}

struct EngineState {
    session: Option<RunSession>,
    view: RunView,
    reconciler: Reconciler,
    subscription: SubscriptionManager,
}

impl AnalysisRunner {
    pub fn new(connector: Arc<dyn AgentConnector>) -> Self {
        let (watch_tx, _) = watch::channel(RunView::default());
        Self {
            connector,
            inner: Arc::new(RunnerInner {
                state: Mutex::new(EngineState {
                    session: None,
                    view: RunView::default(),
                    reconciler: Reconciler::new(),
                    subscription: SubscriptionManager::new(),
                }),
                watch_tx,
            }),
        }
    }

    /// Convenience constructor over the HTTP transport.
    pub fn connect(endpoint: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpAgent::new(endpoint)))
    }

    /// Begin a fresh conversation: new thread, new run, clean view.
    /// Any previous subscription is torn down first — no two subscriptions
    /// are ever live concurrently.
    pub fn start(&self) {
        let (input, generation) = {
            let mut state = self.inner.lock_state();
            let session = RunSession::new();
            debug!(
                target: "core.runner",
                thread_id = %session.thread_id,
                run_id = %session.run_id,
                "starting run"
            );

            let generation = state.subscription.begin();
            state
                .view
                .begin_run(session.thread_id.as_str(), session.run_id.as_str());
            state.reconciler.reset();

            let input = RunAgentInput::new(
                session.thread_id.as_str(),
                session.run_id.as_str(),
            );
            state.session = Some(session);
            self.inner.publish(&state.view);
            (input, generation)
        };

        self.spawn_pump(generation, input);
    }

    /// Resolve the pending approval and continue the run. Approving and
    /// declining are the same operation parameterized by the decision; a
    /// resume without a session is a no-op.
    pub fn resume(&self, approved: bool) {
        let (input, generation) = {
            let mut state = self.inner.lock_state();
            let Some(session) = state.session.as_mut() else {
                trace!(target: "core.runner", "resume without a session is a no-op");
                return;
            };

            session.next_run();
            let thread_id = session.thread_id.as_str().to_string();
            let run_id = session.run_id.as_str().to_string();
            debug!(
                target: "core.runner",
                %thread_id,
                %run_id,
                approved,
                "resuming run"
            );

            let generation = state.subscription.begin();
            state.view.resume_run(&run_id);
            self.inner.publish(&state.view);

            let input = RunAgentInput::new(thread_id, run_id).with_resume(approved);
            (input, generation)
        };

        self.spawn_pump(generation, input);
    }

    pub fn approve(&self) {
        self.resume(true);
    }

    pub fn decline(&self) {
        self.resume(false);
    }

    /// Tear down any subscription, discard the session, restore the idle
    /// view.
    pub fn reset(&self) {
        let mut state = self.inner.lock_state();
        debug!(target: "core.runner", "resetting session");
        state.subscription.unsubscribe();
        state.session = None;
        state.view = RunView::default();
        state.reconciler.reset();
        self.inner.publish(&state.view);
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> RunView {
        self.inner.lock_state().view.clone()
    }

    /// Receiver yielding every reconciled view update.
    pub fn watch(&self) -> watch::Receiver<RunView> {
        self.inner.watch_tx.subscribe()
    }

    fn spawn_pump(&self, generation: u64, input: RunAgentInput) {
        let connector = Arc::clone(&self.connector);
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(pump(connector, inner, generation, input));
        self.inner.lock_state().subscription.attach(generation, handle);
    }
}

impl std::fmt::Debug for AnalysisRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisRunner")
            .field("view", &self.view())
            .finish_non_exhaustive()
    }
}

/// Consume one run's event stream to completion.
async fn pump(
    connector: Arc<dyn AgentConnector>,
    inner: Arc<RunnerInner>,
    generation: u64,
    input: RunAgentInput,
) {
    let mut stream = match connector.run(input).await {
        Ok(stream) => stream,
        Err(err) => {
            inner.fail(generation, &Error::Subscribe(err));
            return;
        }
    };

    while let Some(item) = stream.next().await {
        match item {
            Ok(event) => {
                if !inner.apply(generation, &event) {
                    return;
                }
            }
            Err(err) => {
                inner.fail(generation, &Error::Stream(err));
                return;
            }
        }
    }

    debug!(target: "core.runner", generation, "event stream ended");
}

impl RunnerInner {
    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, view: &RunView) {
        self.watch_tx.send_replace(view.clone());
    }

    /// Fold one event into the view. Returns false once the pump should
    /// stop: its subscription was superseded or the run reached a terminal
    /// status.
    fn apply(&self, generation: u64, event: &AgentEvent) -> bool {
        let mut state = self.lock_state();
        if !state.subscription.is_current(generation) {
            trace!(target: "core.runner", generation, "dropping event from stale subscription");
            return false;
        }

        let EngineState {
            view, reconciler, ..
        } = &mut *state;
        reconciler.apply(view, event);
        self.publish(view);

        if state.view.status.is_terminal() {
            state.subscription.unsubscribe();
            return false;
        }
        true
    }

    /// Record a transport failure for the current run.
    fn fail(&self, generation: u64, error: &Error) {
        let mut state = self.lock_state();
        if !state.subscription.is_current(generation) {
            return;
        }

        warn!(target: "core.runner", %error, "run failed");
        state.view.fail(error.to_string());
        state.subscription.unsubscribe();
        self.publish(&state.view);
    }
}
