//! The live dashboard: every resource polled from the descriptor table.
//!
//! [`Dashboard::start`] spawns one poller per resource and keeps their
//! handles. Readers take [`DashboardSnapshot`]s; a broadcast channel
//! announces each applied poll so a renderer knows when to redraw.

mod snapshot;

pub use snapshot::DashboardSnapshot;

use crate::client::ResourceSource;
use crate::config::PollingConfig;
use crate::model::{CurrentJob, GpuStatus, Job, JobRunnerLog};
use crate::poller::{Invalidator, Poller, ResourceHandle, Subscription};
use crate::readiness::{aggregate, Readiness};
use crate::resource::{Resource, ResourceDescriptor, ResourceKind, ResourceSummary};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// All polled resources plus the token that tears them down.
pub struct Dashboard {
    gpu_status: ResourceHandle<GpuStatus>,
    jobs: ResourceHandle<Vec<Job>>,
    runner_log: ResourceHandle<JobRunnerLog>,
    current_job: ResourceHandle<CurrentJob>,
    updates: broadcast::Sender<ResourceKind>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Dashboard {
    /// Start polling every resource against `source`.
    pub fn start<S: ResourceSource>(source: Arc<S>, config: &PollingConfig) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let poller = Poller::new(source, config).with_broadcast(updates.clone());
        let cancel = CancellationToken::new();
        let mut tasks = Vec::with_capacity(ResourceKind::ALL.len());

        let gpu_status = spawn(&poller, descriptor(config), &cancel, &mut tasks);
        let jobs = spawn(&poller, descriptor(config), &cancel, &mut tasks);
        let runner_log = spawn(&poller, descriptor(config), &cancel, &mut tasks);
        let current_job = spawn(&poller, descriptor(config), &cancel, &mut tasks);

        tracing::info!(resources = tasks.len(), "Dashboard started");

        Self {
            gpu_status,
            jobs,
            runner_log,
            current_job,
            updates,
            cancel,
            tasks,
        }
    }

    pub fn gpu_status(&self) -> &ResourceHandle<GpuStatus> {
        &self.gpu_status
    }

    pub fn jobs(&self) -> &ResourceHandle<Vec<Job>> {
        &self.jobs
    }

    pub fn runner_log(&self) -> &ResourceHandle<JobRunnerLog> {
        &self.runner_log
    }

    pub fn current_job(&self) -> &ResourceHandle<CurrentJob> {
        &self.current_job
    }

    pub fn summaries(&self) -> Vec<ResourceSummary> {
        vec![
            self.gpu_status.summary(),
            self.jobs.summary(),
            self.runner_log.summary(),
            self.current_job.summary(),
        ]
    }

    pub fn readiness(&self) -> Readiness {
        aggregate(&self.summaries())
    }

    /// Consistent-enough copy of every resource for one redraw.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let gpu_status = self.gpu_status.snapshot();
        let jobs = self.jobs.snapshot();
        let runner_log = self.runner_log.snapshot();
        let current_job = self.current_job.snapshot();
        let readiness = aggregate(&[
            gpu_status.summary(ResourceKind::GpuStatus),
            jobs.summary(ResourceKind::Jobs),
            runner_log.summary(ResourceKind::JobRunnerLog),
            current_job.summary(ResourceKind::CurrentJob),
        ]);

        DashboardSnapshot {
            readiness,
            gpu_status,
            jobs,
            runner_log,
            current_job,
        }
    }

    pub fn invalidator(&self, kind: ResourceKind) -> Invalidator {
        match kind {
            ResourceKind::GpuStatus => self.gpu_status.invalidator(),
            ResourceKind::Jobs => self.jobs.invalidator(),
            ResourceKind::JobRunnerLog => self.runner_log.invalidator(),
            ResourceKind::CurrentJob => self.current_job.invalidator(),
        }
    }

    /// Force `kind` to poll now.
    pub fn invalidate(&self, kind: ResourceKind) -> bool {
        self.invalidator(kind).invalidate()
    }

    /// Receive the kind of every resource as its poll completes.
    pub fn subscribe_updates(&self) -> broadcast::Receiver<ResourceKind> {
        self.updates.subscribe()
    }

    /// Wait until the aggregate readiness signal turns true.
    pub async fn wait_ready(&self) -> Readiness {
        let mut updates = self.subscribe_updates();
        loop {
            let readiness = self.readiness();
            if readiness.ready {
                return readiness;
            }
            match updates.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return self.readiness(),
            }
        }
    }

    /// Stop every poller and wait for the tasks to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Poller task ended abnormally");
            }
        }
        tracing::info!("Dashboard stopped");
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn descriptor<T: Resource>(config: &PollingConfig) -> ResourceDescriptor<T> {
    ResourceDescriptor::from_config(config)
}

fn spawn<S: ResourceSource, T: Resource>(
    poller: &Poller<S>,
    descriptor: ResourceDescriptor<T>,
    cancel: &CancellationToken,
    tasks: &mut Vec<JoinHandle<()>>,
) -> ResourceHandle<T> {
    let Subscription { handle, task } = poller.subscribe(descriptor, cancel.clone());
    tasks.push(task);
    handle
}
