//! Jobs command implementation

use crate::cli::context::{build_client, fetch_resource};
use crate::cli::output::{format_error_banner, format_jobs_json, format_jobs_table, format_statuses};
use crate::cli::JobsArgs;
use crate::config::MonitorConfig;
use crate::model::Job;
use crate::readiness::aggregate;
use crate::resource::{ResourceKind, ResourceState};
use crate::view::unique_statuses;

pub async fn run_jobs(config: &MonitorConfig, args: &JobsArgs) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let state: ResourceState<Vec<Job>> = fetch_resource(client, &config.polling).await;
    println!("{}", handle_jobs(&state, args)?);
    Ok(())
}

/// Render the jobs view for one fetched state.
///
/// A failed fetch is reported in the output rather than as an error so the
/// table (possibly empty) still renders.
pub fn handle_jobs(state: &ResourceState<Vec<Job>>, args: &JobsArgs) -> anyhow::Result<String> {
    let filtered = args.filter.to_filter().apply(&state.data);
    let statuses = unique_statuses(&state.data);

    if args.json {
        return Ok(format_jobs_json(&filtered, &statuses)?);
    }

    let mut sections = Vec::new();
    let readiness = aggregate(&[state.summary(ResourceKind::Jobs)]);
    if let Some(banner) = format_error_banner(&readiness.errors) {
        sections.push(banner);
    }
    sections.push(format_jobs_table(&filtered));
    if !statuses.is_empty() {
        sections.push(format_statuses(&statuses));
    }
    Ok(sections.join("\n"))
}
