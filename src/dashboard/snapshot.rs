//! Point-in-time copy of every resource.

use crate::model::{CurrentJob, GpuStatus, Job, JobRunnerLog};
use crate::readiness::Readiness;
use crate::resource::ResourceState;

#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub readiness: Readiness,
    pub gpu_status: ResourceState<GpuStatus>,
    pub jobs: ResourceState<Vec<Job>>,
    pub runner_log: ResourceState<JobRunnerLog>,
    pub current_job: ResourceState<CurrentJob>,
}

impl DashboardSnapshot {
    /// Most recent successful update across all resources.
    pub fn last_updated_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        [
            self.gpu_status.last_updated_at,
            self.jobs.last_updated_at,
            self.runner_log.last_updated_at,
            self.current_job.last_updated_at,
        ]
        .into_iter()
        .flatten()
        .max()
    }
}
