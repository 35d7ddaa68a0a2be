//! Wire types mirrored from the scheduler API.
//!
//! Every type here tolerates missing fields: the scheduler has shipped
//! several variants of these payloads and the monitor must render whatever
//! subset it receives.

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel the scheduler uses for timestamps that have not been reached yet.
pub const NOT_REACHED: &str = "-";

/// A job record from `GET /api/jobs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub program: String,
    #[serde(deserialize_with = "string_or_number")]
    pub python_exec: String,
    #[serde(deserialize_with = "string_or_number")]
    pub user: String,
    #[serde(deserialize_with = "string_or_number")]
    pub email: String,
    /// Open set; the scheduler reports at least pending, running, completed, failed
    #[serde(deserialize_with = "string_or_number")]
    pub status: String,
    #[serde(deserialize_with = "string_or_number")]
    pub created: String,
    /// `null` reads as [`NOT_REACHED`]
    #[serde(deserialize_with = "timestamp_or_not_reached")]
    pub started: String,
    #[serde(deserialize_with = "timestamp_or_not_reached")]
    pub completed: String,
    /// Opaque, frequently a JSON document
    #[serde(deserialize_with = "string_or_number")]
    pub parameters: String,
    #[serde(deserialize_with = "string_or_number")]
    pub error: String,
}

/// Details of the job currently holding the GPU lock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuJobInfo {
    pub user: Option<String>,
    pub script: Option<String>,
    pub started: Option<String>,
    #[serde(deserialize_with = "optional_string_or_number")]
    pub pid: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub job_id: Option<u64>,
}

/// GPU occupancy from `GET /api/gpu-status`.
///
/// Job details only exist while the GPU is in use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GpuStatus {
    #[default]
    Available,
    InUse(GpuJobInfo),
}

impl GpuStatus {
    pub fn is_in_use(&self) -> bool {
        matches!(self, GpuStatus::InUse(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            GpuStatus::Available => "Available",
            GpuStatus::InUse(_) => "In Use",
        }
    }
}

/// The runner's daily logs from `GET /api/job-runner-log`.
///
/// The three sequences are parallel: entry `i` of each describes the same
/// day. Order is whatever the server returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRunnerLog {
    #[serde(rename = "availableDates")]
    pub available_dates: Vec<String>,
    pub content: Vec<String>,
    pub log_files: Vec<String>,
}

impl JobRunnerLog {
    /// True when the parallel sequences have matching lengths.
    pub fn is_consistent(&self) -> bool {
        self.content.len() == self.available_dates.len()
            && self.log_files.len() == self.available_dates.len()
    }
}

/// Output of the job currently running, from `GET /api/current-job`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CurrentJob {
    /// Nothing is running
    #[default]
    None,
    /// A job launched from the command line; its output is not retrievable
    Cli,
    /// A queued job whose terminal output is captured by the runner
    Sql {
        #[serde(default, alias = "output")]
        content: Option<String>,
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        job_id: Option<u64>,
    },
}

impl CurrentJob {
    /// Whether this variant carries output the monitor can show.
    pub fn has_output(&self) -> bool {
        match self {
            CurrentJob::None | CurrentJob::Cli => false,
            CurrentJob::Sql { .. } => true,
        }
    }

    pub fn display_text(&self) -> &str {
        match self {
            CurrentJob::None => "No job currently running",
            CurrentJob::Cli => "CLI job currently running. Cannot display output",
            CurrentJob::Sql { error: Some(error), .. } if !error.is_empty() => error.as_str(),
            CurrentJob::Sql { content: Some(content), .. } if !content.is_empty() => content.as_str(),
            CurrentJob::Sql { .. } => "No output available",
        }
    }
}

/// Response body of `DELETE /api/remove_job_logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveJobLogsResult {
    pub message: String,
    #[serde(default)]
    pub removed_count: u64,
}

/// The scheduler formats ids as zero-padded strings, older versions sent numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string_or_number(deserializer)?.unwrap_or_default())
}

/// Timestamps the job has not reached yet arrive as `null` from some scheduler versions.
fn timestamp_or_not_reached<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string_or_number(deserializer)?.unwrap_or_else(|| NOT_REACHED.to_string()))
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}
