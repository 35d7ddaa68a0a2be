//! Log retention: the monitor's single write operation.
//!
//! Deleting old runner logs is confirmed by the server before anything in
//! the view changes; on success the runner-log resource is invalidated so
//! the next poll shows what is left.

use crate::client::{FetchError, RetentionApi};
use crate::model::RemoveJobLogsResult;
use crate::poller::Invalidator;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Message shown whenever the cleanup fails, whatever the cause.
pub const REMOVE_LOGS_FAILED: &str = "Failed to remove old logs";

/// Shown when a cleanup is requested while another is still outstanding.
pub const CLEANUP_IN_PROGRESS: &str = "Log cleanup already in progress";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetentionError {
    /// Another cleanup is still outstanding
    #[error("log cleanup already in progress")]
    InFlight,

    #[error("log cleanup request failed: {0}")]
    Request(#[from] FetchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSeverity {
    Success,
    /// Nothing was sent; an earlier request is still running
    Info,
    Error,
}

/// Transient message describing the outcome of a cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: NotificationSeverity,
    pub message: String,
}

impl Notification {
    fn from_outcome(outcome: &Result<RemoveJobLogsResult, RetentionError>) -> Self {
        match outcome {
            Ok(result) => Notification {
                severity: NotificationSeverity::Success,
                message: result.message.clone(),
            },
            Err(RetentionError::InFlight) => Notification {
                severity: NotificationSeverity::Info,
                message: CLEANUP_IN_PROGRESS.to_string(),
            },
            Err(RetentionError::Request(_)) => Notification {
                severity: NotificationSeverity::Error,
                message: REMOVE_LOGS_FAILED.to_string(),
            },
        }
    }
}

/// Issues `DELETE /api/remove_job_logs`, at most one at a time.
pub struct RetentionMutation<A> {
    api: Arc<A>,
    runner_log: Invalidator,
    in_flight: AtomicBool,
}

impl<A: RetentionApi> RetentionMutation<A> {
    pub fn new(api: Arc<A>, runner_log: Invalidator) -> Self {
        Self {
            api,
            runner_log,
            in_flight: AtomicBool::new(false),
        }
    }

    /// True while a cleanup request is outstanding; the trigger stays disabled.
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Remove old logs on the server.
    ///
    /// Returns [`RetentionError::InFlight`] without sending anything if a
    /// previous call has not finished.
    pub async fn remove_old_logs(&self) -> Result<RemoveJobLogsResult, RetentionError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(RetentionError::InFlight)?;

        match self.api.remove_job_logs().await {
            Ok(result) => {
                tracing::info!(
                    removed_count = result.removed_count,
                    message = %result.message,
                    "Old job logs removed"
                );
                self.on_success();
                Ok(result)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Removing old job logs failed");
                Err(RetentionError::Request(error))
            }
        }
    }

    /// Run the cleanup and describe the outcome for the operator.
    pub async fn trigger(&self) -> Notification {
        let outcome = self.remove_old_logs().await;
        Notification::from_outcome(&outcome)
    }

    /// Refresh the runner log after a confirmed cleanup.
    ///
    /// Safe to call repeatedly: pending invalidations collapse into one re-poll.
    pub fn on_success(&self) {
        if !self.runner_log.invalidate() {
            tracing::debug!("Runner log refresh already pending");
        }
    }
}

/// Holds the in-flight flag for the duration of one request, also across cancellation.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
