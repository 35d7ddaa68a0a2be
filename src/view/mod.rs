//! Pure view derivations over the polled resources.
//!
//! Nothing in here performs I/O or mutates its inputs; the dashboard calls
//! these on every redraw with the latest resource state.

mod filter;
mod format;
mod log;

pub use filter::{filter_jobs, parse_timestamp, unique_statuses, JobFilter};
pub use format::{format_date, format_parameters, status_to_severity, truncate, Severity};
pub use log::{log_page, select_log_index, should_offer_cleanup, LogPage, LOG_RETENTION_DAYS};
