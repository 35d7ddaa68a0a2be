//! Resource descriptor table and per-resource state.
//!
//! Each independently polled piece of scheduler state is a *resource*. The
//! static table ([`ResourceKind`]) maps a resource to its endpoint and
//! default cadence; [`Resource`] ties a wire type to its kind and default
//! value so descriptors can be built generically.

mod state;

pub use state::{ResourceState, ResourceSummary};

use crate::config::PollingConfig;
use crate::model::{CurrentJob, GpuStatus, Job, JobRunnerLog};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

/// The resources the monitor polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    GpuStatus,
    Jobs,
    JobRunnerLog,
    CurrentJob,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::GpuStatus,
        ResourceKind::Jobs,
        ResourceKind::JobRunnerLog,
        ResourceKind::CurrentJob,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::GpuStatus => "gpu_status",
            ResourceKind::Jobs => "jobs",
            ResourceKind::JobRunnerLog => "job_runner_log",
            ResourceKind::CurrentJob => "current_job",
        }
    }

    /// Path segment under `/api/`.
    pub fn endpoint_key(self) -> &'static str {
        match self {
            ResourceKind::GpuStatus => "gpu-status",
            ResourceKind::Jobs => "jobs",
            ResourceKind::JobRunnerLog => "job-runner-log",
            ResourceKind::CurrentJob => "current-job",
        }
    }

    pub fn poll_interval(self, config: &PollingConfig) -> Duration {
        let ms = match self {
            ResourceKind::GpuStatus => config.gpu_status_ms,
            ResourceKind::Jobs => config.jobs_ms,
            ResourceKind::JobRunnerLog => config.job_runner_log_ms,
            ResourceKind::CurrentJob => config.current_job_ms,
        };
        Duration::from_millis(ms.max(1))
    }

    /// Whether the view needs real server data for this resource before it
    /// can render. Every other resource renders fine from its default.
    pub fn requires_data(self) -> bool {
        matches!(self, ResourceKind::GpuStatus)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A wire type that can be polled as a resource.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// Value shown before the first response and whenever the server has no data.
    fn default_value() -> Self;
}

impl Resource for GpuStatus {
    const KIND: ResourceKind = ResourceKind::GpuStatus;

    fn default_value() -> Self {
        GpuStatus::Available
    }
}

impl Resource for Vec<Job> {
    const KIND: ResourceKind = ResourceKind::Jobs;

    fn default_value() -> Self {
        Vec::new()
    }
}

impl Resource for JobRunnerLog {
    const KIND: ResourceKind = ResourceKind::JobRunnerLog;

    fn default_value() -> Self {
        JobRunnerLog::default()
    }
}

impl Resource for CurrentJob {
    const KIND: ResourceKind = ResourceKind::CurrentJob;

    fn default_value() -> Self {
        CurrentJob::None
    }
}

/// Immutable description of one polled resource.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor<T> {
    pub kind: ResourceKind,
    pub name: &'static str,
    pub endpoint_key: &'static str,
    pub default_value: T,
    pub poll_interval: Duration,
}

impl<T: Resource> ResourceDescriptor<T> {
    /// Build the descriptor for `T` from the static table and the polling config.
    pub fn from_config(config: &PollingConfig) -> Self {
        let kind = T::KIND;
        Self {
            kind,
            name: kind.name(),
            endpoint_key: kind.endpoint_key(),
            default_value: T::default_value(),
            poll_interval: kind.poll_interval(config),
        }
    }
}

impl<T> ResourceDescriptor<T> {
    /// Replace the cadence, keeping everything else.
    pub fn with_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}
