//! Ownership of the single live event-stream subscription.

use tokio::task::JoinHandle;
use tracing::trace;

/// At most one subscription to the remote event source is live at a time.
///
/// Every teardown bumps a generation counter; a pump task carries the
/// generation it was spawned under and checks [`is_current`] before each
/// mutation, so a superseded task that was parked at an await point can
/// never touch state belonging to a newer run.
///
/// [`is_current`]: SubscriptionManager::is_current
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    generation: u64,
    active: Option<Subscription>,
}

#[derive(Debug)]
struct Subscription {
    generation: u64,
    handle: JoinHandle<()>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down any live subscription and reserve the generation for the
    /// next one.
    pub fn begin(&mut self) -> u64 {
        self.unsubscribe();
        self.generation
    }

    /// Hand the spawned pump's handle over. Refused (and aborted) when a
    /// newer `begin` has already superseded this generation.
    pub fn attach(&mut self, generation: u64, handle: JoinHandle<()>) {
        if generation == self.generation && self.active.is_none() {
            self.active = Some(Subscription { generation, handle });
        } else {
            trace!(target: "core.subscription", generation, "refusing stale subscription");
            handle.abort();
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Idempotent teardown. Invalidates the outstanding generation so late
    /// events from the old stream are dropped.
    pub fn unsubscribe(&mut self) {
        self.generation += 1;
        if let Some(subscription) = self.active.take() {
            trace!(
                target: "core.subscription",
                generation = subscription.generation,
                "aborting subscription"
            );
            subscription.handle.abort();
        }
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }
}
