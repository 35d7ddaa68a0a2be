//! Display formatting helpers.

use super::filter::parse_timestamp;
use crate::model::NOT_REACHED;
use serde::Serialize;

/// Severity vocabulary used to color job statuses and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
    Success,
    Error,
    Default,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Default => "default",
        }
    }
}

/// Map a job status to a severity, ignoring case.
pub fn status_to_severity(status: &str) -> Severity {
    match status.to_lowercase().as_str() {
        "pending" => Severity::Warning,
        "running" => Severity::Info,
        "completed" => Severity::Success,
        "failed" => Severity::Error,
        _ => Severity::Default,
    }
}

/// Render a timestamp as `MM/DD/YYYY HH:MM`.
///
/// `"-"` (not reached yet) and anything unparseable come back unchanged.
pub fn format_date(date: &str) -> String {
    if date == NOT_REACHED {
        return NOT_REACHED.to_string();
    }
    match parse_timestamp(date) {
        Some(ts) => ts.format("%m/%d/%Y %H:%M").to_string(),
        None => date.to_string(),
    }
}

/// Pretty-print JSON parameter or error text; other text passes through.
pub fn format_parameters(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => {
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| text.to_string())
        }
        _ => text.to_string(),
    }
}

/// Shorten `text` to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}
