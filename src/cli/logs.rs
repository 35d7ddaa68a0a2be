//! Logs command implementation

use crate::cli::context::{build_client, fetch_resource, open_selection};
use crate::cli::output::{format_cleanup_hint, format_error_banner, format_log_dates, format_log_page};
use crate::cli::LogsArgs;
use crate::config::MonitorConfig;
use crate::model::JobRunnerLog;
use crate::readiness::aggregate;
use crate::resource::{ResourceKind, ResourceState};
use crate::store::PersistedSelection;
use crate::view::{log_page, select_log_index};

pub async fn run_logs(config: &MonitorConfig, args: &LogsArgs) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let state: ResourceState<JobRunnerLog> = fetch_resource(client, &config.polling).await;
    let selection = open_selection(config);
    println!("{}", handle_logs(&state, args, &selection));
    Ok(())
}

/// Render the runner log view, persisting `--index` when given.
pub fn handle_logs(
    state: &ResourceState<JobRunnerLog>,
    args: &LogsArgs,
    selection: &PersistedSelection,
) -> String {
    let log = &state.data;
    let dates = &log.available_dates;

    let index = match args.index {
        Some(requested) => {
            let index = select_log_index(dates, requested);
            selection.save(index);
            index
        }
        None => selection.load(dates),
    };

    let mut sections = Vec::new();
    let readiness = aggregate(&[state.summary(ResourceKind::JobRunnerLog)]);
    if let Some(banner) = format_error_banner(&readiness.errors) {
        sections.push(banner);
    }

    if args.list {
        sections.push(format_log_dates(dates, index));
    } else {
        match log_page(log, index) {
            Some(page) => sections.push(format_log_page(&page, dates.len())),
            None if !log.is_consistent() => {
                tracing::warn!(
                    dates = dates.len(),
                    content = log.content.len(),
                    files = log.log_files.len(),
                    "Runner log arrays disagree in length"
                );
                sections.push("Runner log is malformed".to_string());
            }
            None => sections.push("No runner logs available".to_string()),
        }
    }

    if let Some(hint) = format_cleanup_hint(dates.len()) {
        sections.push(hint);
    }
    sections.join("\n\n")
}
