//! Poll cadence and retry configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fast cadence for real-time data (GPU status, current job output)
pub const FAST_INTERVAL_MS: u64 = 5_000;

/// Normal cadence for slower-moving data (job list, runner log)
pub const NORMAL_INTERVAL_MS: u64 = 30_000;

/// Poll intervals per resource plus the retry policy shared by all pollers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub gpu_status_ms: u64,
    pub jobs_ms: u64,
    pub job_runner_log_ms: u64,
    pub current_job_ms: u64,
    /// Extra attempts after a failed fetch before the error is surfaced
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl PollingConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            gpu_status_ms: FAST_INTERVAL_MS,
            jobs_ms: NORMAL_INTERVAL_MS,
            job_runner_log_ms: NORMAL_INTERVAL_MS,
            current_job_ms: FAST_INTERVAL_MS,
            retry_attempts: 1,
            retry_delay_ms: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polling_defaults() {
        let config = PollingConfig::default();
        assert_eq!(config.gpu_status_ms, 5000);
        assert_eq!(config.jobs_ms, 30000);
        assert_eq!(config.job_runner_log_ms, 30000);
        assert_eq!(config.current_job_ms, 5000);
        assert_eq!(config.retry_attempts, 1);
    }

    #[test]
    fn test_polling_partial_toml() {
        let config: PollingConfig = toml::from_str("jobs_ms = 10000").unwrap();
        assert_eq!(config.jobs_ms, 10000);
        assert_eq!(config.gpu_status_ms, FAST_INTERVAL_MS);
    }
}
