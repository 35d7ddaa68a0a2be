//! Reader-side handles onto a running poller.

use crate::resource::{ResourceKind, ResourceState, ResourceSummary};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// A live view of one resource's state.
#[derive(Debug, Clone)]
pub struct ResourceHandle<T> {
    kind: ResourceKind,
    state: watch::Receiver<ResourceState<T>>,
    invalidator: Invalidator,
}

impl<T: Clone> ResourceHandle<T> {
    pub(super) fn new(
        kind: ResourceKind,
        state: watch::Receiver<ResourceState<T>>,
        invalidator: Invalidator,
    ) -> Self {
        Self {
            kind,
            state,
            invalidator,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Copy of the latest state.
    pub fn snapshot(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    pub fn summary(&self) -> ResourceSummary {
        self.state.borrow().summary(self.kind)
    }

    /// Wait for the next state change. Returns false once the poller is gone.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    /// Force the next poll to happen now.
    pub fn invalidate(&self) -> bool {
        self.invalidator.invalidate()
    }

    pub fn invalidator(&self) -> Invalidator {
        self.invalidator.clone()
    }
}

/// Forces an immediate re-poll of one resource.
///
/// Cheap to clone; every clone targets the same poller.
#[derive(Debug, Clone)]
pub struct Invalidator {
    kind: ResourceKind,
    tx: mpsc::Sender<()>,
}

impl Invalidator {
    pub(super) fn new(kind: ResourceKind, tx: mpsc::Sender<()>) -> Self {
        Self { kind, tx }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Request an immediate poll.
    ///
    /// Returns false when a request is already pending (the two collapse into
    /// one re-poll) or the poller has stopped.
    pub fn invalidate(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => {
                tracing::debug!(resource = self.kind.name(), "Invalidation queued");
                true
            }
            Err(mpsc::error::TrySendError::Full(())) => false,
            Err(mpsc::error::TrySendError::Closed(())) => {
                tracing::debug!(resource = self.kind.name(), "Invalidation after teardown ignored");
                false
            }
        }
    }
}

/// A freshly started poller: its handle plus the background task.
#[derive(Debug)]
pub struct Subscription<T> {
    pub handle: ResourceHandle<T>,
    pub task: JoinHandle<()>,
}
