//! Table-driven resource polling.
//!
//! One background task per subscribed resource. Each task fetches
//! immediately, then once per interval, forever; polls of one resource never
//! overlap and ticks that fire during a slow fetch are dropped. State is
//! published through a `watch` channel so every reader sees the latest value.

mod handle;


pub use handle::{Invalidator, ResourceHandle, Subscription};

use crate::client::{FetchError, ResourceSource};
use crate::config::PollingConfig;
use crate::resource::{ResourceDescriptor, ResourceKind, ResourceState};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Spawns and drives one polling task per resource.
pub struct Poller<S> {
    /// Where payloads come from
    source: Arc<S>,
    /// Extra attempts after a failed fetch
    retry_attempts: u32,
    /// Pause between attempts
    retry_delay: Duration,
    /// Optional channel announcing every applied poll
    updates: Option<broadcast::Sender<ResourceKind>>,
}

impl<S: ResourceSource> Poller<S> {
    pub fn new(source: Arc<S>, config: &PollingConfig) -> Self {
        Self {
            source,
            retry_attempts: config.retry_attempts,
            retry_delay: config.retry_delay(),
            updates: None,
        }
    }

    /// Announce the kind of every resource whose state changed.
    pub fn with_broadcast(mut self, sender: broadcast::Sender<ResourceKind>) -> Self {
        self.updates = Some(sender);
        self
    }

    /// Start polling `descriptor` until `cancel` fires or every handle is dropped.
    pub fn subscribe<T>(
        &self,
        descriptor: ResourceDescriptor<T>,
        cancel: CancellationToken,
    ) -> Subscription<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let (state_tx, state_rx) =
            watch::channel(ResourceState::initial(descriptor.default_value.clone()));
        // Capacity one: invalidations issued before the task consumes one are coalesced.
        let (invalidate_tx, invalidate_rx) = mpsc::channel(1);

        let task = PollTask {
            source: Arc::clone(&self.source),
            descriptor,
            retry_attempts: self.retry_attempts,
            retry_delay: self.retry_delay,
            updates: self.updates.clone(),
            state: state_tx,
            invalidations: invalidate_rx,
        };
        let kind = task.descriptor.kind;
        let join = tokio::spawn(task.run(cancel));

        Subscription {
            handle: ResourceHandle::new(kind, state_rx, Invalidator::new(kind, invalidate_tx)),
            task: join,
        }
    }
}

struct PollTask<S, T> {
    source: Arc<S>,
    descriptor: ResourceDescriptor<T>,
    retry_attempts: u32,
    retry_delay: Duration,
    updates: Option<broadcast::Sender<ResourceKind>>,
    state: watch::Sender<ResourceState<T>>,
    invalidations: mpsc::Receiver<()>,
}

impl<S, T> PollTask<S, T>
where
    S: ResourceSource,
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn run(mut self, cancel: CancellationToken) {
        let resource = self.descriptor.name;
        let mut interval = tokio::time::interval(self.descriptor.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            resource,
            interval_ms = self.descriptor.poll_interval.as_millis() as u64,
            "Poller started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.state.closed() => {
                    tracing::debug!(resource, "All handles dropped");
                    break;
                }
                _ = interval.tick() => {}
                Some(()) = self.invalidations.recv() => {
                    tracing::debug!(resource, "Invalidated, polling now");
                    interval.reset();
                }
            }

            let outcome = tokio::select! {
                _ = cancel.cancelled() => break,
                outcome = self.fetch_with_retry() => outcome,
            };

            // A response that lands after teardown is discarded.
            if cancel.is_cancelled() {
                break;
            }
            self.apply(outcome);
        }

        tracing::info!(resource, "Poller stopped");
    }

    async fn fetch_with_retry(&self) -> Result<Option<T>, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once().await {
                Ok(payload) => return Ok(payload),
                Err(error) if attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::debug!(
                        resource = self.descriptor.name,
                        attempt,
                        error = %error,
                        "Poll failed, retrying"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn fetch_once(&self) -> Result<Option<T>, FetchError> {
        let start = Instant::now();
        let payload = self.source.fetch(self.descriptor.endpoint_key).await;

        metrics::histogram!("gpumon_poll_latency_seconds",
            "resource" => self.descriptor.name
        )
        .record(start.elapsed().as_secs_f64());

        payload?
            .map(|value| {
                serde_json::from_value(value).map_err(|e| FetchError::ParseError(e.to_string()))
            })
            .transpose()
    }

    fn apply(&self, outcome: Result<Option<T>, FetchError>) {
        let resource = self.descriptor.name;
        match outcome {
            Ok(payload) => {
                tracing::debug!(resource, empty = payload.is_none(), "Poll succeeded");
                let default_value = &self.descriptor.default_value;
                self.state
                    .send_modify(|state| state.apply_success(payload, default_value));
            }
            Err(error) => {
                metrics::counter!("gpumon_poll_failures_total", "resource" => resource)
                    .increment(1);
                tracing::warn!(resource, error = %error, "Poll failed, keeping last known data");
                self.state.send_modify(|state| state.apply_failure(error));
            }
        }

        if let Some(updates) = &self.updates {
            // Ignore error if no receivers are listening
            let _ = updates.send(self.descriptor.kind);
        }
    }
}
