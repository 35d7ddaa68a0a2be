//! Job list filtering.

use crate::model::Job;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse the date/time shapes the scheduler emits.
///
/// Date-only values resolve to midnight. Offsets are normalised to UTC.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// A date bound as typed by the operator.
enum Bound {
    Open,
    At(NaiveDateTime),
    /// Set but unparseable; nothing can satisfy it
    Invalid,
}

impl Bound {
    fn parse(s: &str) -> Self {
        if s.is_empty() {
            return Bound::Open;
        }
        parse_timestamp(s).map_or(Bound::Invalid, Bound::At)
    }

    fn admits(
        &self,
        created: Option<NaiveDateTime>,
        cmp: fn(&NaiveDateTime, &NaiveDateTime) -> bool,
    ) -> bool {
        match (self, created) {
            (Bound::Open, _) => true,
            (Bound::At(bound), Some(created)) => cmp(&created, bound),
            (Bound::At(_), None) | (Bound::Invalid, _) => false,
        }
    }
}

/// Keep jobs matching every non-empty predicate.
///
/// - `status_filter`: exact status match
/// - `start_date`: created at or after
/// - `end_date`: created at or before
///
/// A job whose `created` cannot be parsed fails any date bound that is set.
pub fn filter_jobs(
    jobs: &[Job],
    status_filter: &str,
    start_date: &str,
    end_date: &str,
) -> Vec<Job> {
    let start = Bound::parse(start_date);
    let end = Bound::parse(end_date);

    jobs.iter()
        .filter(|job| {
            let matches_status = status_filter.is_empty() || job.status == status_filter;
            let created = parse_timestamp(&job.created);
            matches_status
                && start.admits(created, |c, b| c >= b)
                && end.admits(created, |c, b| c <= b)
        })
        .cloned()
        .collect()
}

/// Distinct statuses in order of first appearance.
pub fn unique_statuses(jobs: &[Job]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for job in jobs {
        if !seen.iter().any(|s| s == &job.status) {
            seen.push(job.status.clone());
        }
    }
    seen
}

/// Operator-chosen filter values; empty strings disable a predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub status: String,
    pub start_date: String,
    pub end_date: String,
}

impl JobFilter {
    pub fn apply(&self, jobs: &[Job]) -> Vec<Job> {
        filter_jobs(jobs, &self.status, &self.start_date, &self.end_date)
    }

    pub fn is_active(&self) -> bool {
        !(self.status.is_empty() && self.start_date.is_empty() && self.end_date.is_empty())
    }
}
