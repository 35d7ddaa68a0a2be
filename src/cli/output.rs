//! Output formatting helpers for CLI commands

use crate::dashboard::DashboardSnapshot;
use crate::model::{CurrentJob, GpuStatus, Job};
use crate::readiness::ResourceError;
use crate::retention::{Notification, NotificationSeverity};
use crate::view::{
    format_date, log_page, should_offer_cleanup, status_to_severity, truncate, JobFilter, LogPage,
    Severity, LOG_RETENTION_DAYS,
};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

const SHORT_CELL: usize = 30;
const LONG_CELL: usize = 40;

/// Color `text` by severity.
pub fn paint(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Warning => text.yellow(),
        Severity::Info => text.cyan(),
        Severity::Success => text.green(),
        Severity::Error => text.red(),
        Severity::Default => text.normal(),
    }
}

/// Format the GPU status card
pub fn format_gpu_card(status: &GpuStatus) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["GPU", "Value"]);

    let label = match status {
        GpuStatus::Available => paint(status.label(), Severity::Success),
        GpuStatus::InUse(_) => paint(status.label(), Severity::Warning),
    };
    table.add_row(vec![Cell::new("Status"), Cell::new(label)]);

    if let GpuStatus::InUse(info) = status {
        let rows = [
            ("User", info.user.clone()),
            ("Script", info.script.clone()),
            ("Started", info.started.as_deref().map(format_date)),
            ("PID", info.pid.clone()),
            ("Type", info.job_type.clone()),
            ("Job ID", info.job_id.map(|id| id.to_string())),
        ];
        for (name, value) in rows {
            if let Some(value) = value {
                table.add_row(vec![Cell::new(name), Cell::new(value)]);
            }
        }
    }

    table.to_string()
}

/// Format jobs as a table
pub fn format_jobs_table(jobs: &[Job]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "ID",
        "Program",
        "Email",
        "Parameters",
        "Status",
        "Created",
        "Started",
        "Completed",
        "Error",
    ]);

    for job in jobs {
        table.add_row(vec![
            Cell::new(&job.id),
            Cell::new(truncate(&job.program, SHORT_CELL)),
            Cell::new(truncate(&job.email, SHORT_CELL)),
            Cell::new(truncate(&job.parameters, LONG_CELL)),
            Cell::new(paint(&job.status, status_to_severity(&job.status))),
            Cell::new(format_date(&job.created)),
            Cell::new(format_date(&job.started)),
            Cell::new(format_date(&job.completed)),
            Cell::new(truncate(&job.error, LONG_CELL)),
        ]);
    }

    table.to_string()
}

/// Format jobs as JSON
pub fn format_jobs_json(jobs: &[Job], statuses: &[String]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({
        "jobs": jobs,
        "statuses": statuses,
    }))
}

/// One line listing the statuses present, each in its severity color.
pub fn format_statuses(statuses: &[String]) -> String {
    let painted: Vec<String> = statuses
        .iter()
        .map(|s| paint(s, status_to_severity(s)).to_string())
        .collect();
    format!("Statuses: {}", painted.join(", "))
}

pub fn format_current_job(job: &CurrentJob) -> String {
    let heading = match job {
        CurrentJob::Sql { job_id: Some(id), .. } => format!("Current job #{}", id),
        _ => "Current job".to_string(),
    };
    let body = match job {
        CurrentJob::Sql { error: Some(e), .. } if !e.is_empty() => {
            paint(job.display_text(), Severity::Error).to_string()
        }
        _ => job.display_text().to_string(),
    };
    format!("{}\n{}", heading.bold(), body)
}

pub fn format_gpu_json(status: &GpuStatus, current_job: &CurrentJob) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({
        "gpu_status": status,
        "current_job": current_job,
    }))
}

pub fn format_log_page(page: &LogPage<'_>, total: usize) -> String {
    format!(
        "{} {} ({} of {}) {}\n\n{}",
        "Runner log".bold(),
        page.date,
        page.index + 1,
        total,
        page.file.dimmed(),
        page.content
    )
}

/// Format available log dates, marking the selected one
pub fn format_log_dates(dates: &[String], selected: usize) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Index", "Date", ""]);

    for (i, date) in dates.iter().enumerate() {
        let marker = if i == selected { "◀" } else { "" };
        table.add_row(vec![Cell::new(i), Cell::new(date), Cell::new(marker)]);
    }

    table.to_string()
}

/// Lines naming every resource whose last poll failed.
pub fn format_error_banner(errors: &[ResourceError]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    let lines: Vec<String> = errors
        .iter()
        .map(|e| format!("✗ {}: {}", e.resource, e.message).red().to_string())
        .collect();
    Some(lines.join("\n"))
}

pub fn format_cleanup_hint(available_dates_len: usize) -> Option<String> {
    should_offer_cleanup(available_dates_len).then(|| {
        format!(
            "{} days of runner logs kept; run `gpumon clean-logs` to remove logs older than {} days",
            available_dates_len, LOG_RETENTION_DAYS
        )
        .yellow()
        .to_string()
    })
}

pub fn format_notification(notification: &Notification) -> String {
    match notification.severity {
        NotificationSeverity::Success => format!("✓ {}", notification.message).green().to_string(),
        NotificationSeverity::Info => format!("… {}", notification.message).cyan().to_string(),
        NotificationSeverity::Error => format!("✗ {}", notification.message).red().to_string(),
    }
}

/// Full dashboard frame.
pub fn render_dashboard(snapshot: &DashboardSnapshot, filter: &JobFilter, log_index: usize) -> String {
    if !snapshot.readiness.ready {
        let mut frame = "Loading…".dimmed().to_string();
        if let Some(banner) = format_error_banner(&snapshot.readiness.errors) {
            frame.push_str("\n\n");
            frame.push_str(&banner);
        }
        return frame;
    }

    let mut sections = Vec::new();
    if let Some(banner) = format_error_banner(&snapshot.readiness.errors) {
        sections.push(banner);
    }
    if let Some(at) = snapshot.last_updated_at() {
        sections.push(format!("Updated {}", at.format("%H:%M:%S")).dimmed().to_string());
    }

    sections.push(format_gpu_card(&snapshot.gpu_status.data));
    sections.push(format_current_job(&snapshot.current_job.data));

    let jobs = filter.apply(&snapshot.jobs.data);
    let mut jobs_heading = format!("Jobs ({})", jobs.len());
    if filter.is_active() {
        jobs_heading.push_str(&format!(" of {}", snapshot.jobs.data.len()));
    }
    sections.push(jobs_heading.bold().to_string());
    sections.push(format_jobs_table(&jobs));

    let log = &snapshot.runner_log.data;
    match log_page(log, log_index) {
        Some(page) => sections.push(format_log_page(&page, log.available_dates.len())),
        None => sections.push("No runner logs available".dimmed().to_string()),
    }
    if let Some(hint) = format_cleanup_hint(log.available_dates.len()) {
        sections.push(hint);
    }

    sections.join("\n\n")
}
