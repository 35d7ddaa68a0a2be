//! Runner log navigation.

use crate::model::JobRunnerLog;

/// Days of runner logs kept by the server's retention policy.
///
/// Client-side only: it decides when the cleanup control is offered.
pub const LOG_RETENTION_DAYS: usize = 7;

/// Clamp `requested` into the valid index range of `available_dates`.
///
/// Returns 0 for an empty list.
pub fn select_log_index(available_dates: &[String], requested: usize) -> usize {
    requested.min(available_dates.len().saturating_sub(1))
}

/// Whether the "remove old logs" control should be offered.
pub fn should_offer_cleanup(available_dates_len: usize) -> bool {
    available_dates_len > LOG_RETENTION_DAYS
}

/// One day of the runner log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogPage<'a> {
    pub index: usize,
    pub date: &'a str,
    pub content: &'a str,
    pub file: &'a str,
}

/// The page at `requested` (clamped), or `None` when the log is empty or its
/// parallel sequences disagree in length.
pub fn log_page(log: &JobRunnerLog, requested: usize) -> Option<LogPage<'_>> {
    if log.available_dates.is_empty() || !log.is_consistent() {
        return None;
    }
    let index = select_log_index(&log.available_dates, requested);
    Some(LogPage {
        index,
        date: &log.available_dates[index],
        content: &log.content[index],
        file: &log.log_files[index],
    })
}
