//! GPU command implementation

use crate::cli::context::{build_client, fetch_resource};
use crate::cli::output::{format_current_job, format_error_banner, format_gpu_card, format_gpu_json};
use crate::cli::GpuArgs;
use crate::config::MonitorConfig;
use crate::model::{CurrentJob, GpuStatus};
use crate::readiness::aggregate;
use crate::resource::{ResourceKind, ResourceState};

pub async fn run_gpu(config: &MonitorConfig, args: &GpuArgs) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let (gpu_status, current_job) = tokio::join!(
        fetch_resource::<_, GpuStatus>(client.clone(), &config.polling),
        fetch_resource::<_, CurrentJob>(client, &config.polling),
    );
    println!("{}", handle_gpu(&gpu_status, &current_job, args)?);
    Ok(())
}

pub fn handle_gpu(
    gpu_status: &ResourceState<GpuStatus>,
    current_job: &ResourceState<CurrentJob>,
    args: &GpuArgs,
) -> anyhow::Result<String> {
    let readiness = aggregate(&[
        gpu_status.summary(ResourceKind::GpuStatus),
        current_job.summary(ResourceKind::CurrentJob),
    ]);
    if !readiness.ready {
        let banner = format_error_banner(&readiness.errors).unwrap_or_default();
        anyhow::bail!("GPU status unavailable\n{}", banner);
    }

    if args.json {
        return Ok(format_gpu_json(&gpu_status.data, &current_job.data)?);
    }

    let mut sections = Vec::new();
    if let Some(banner) = format_error_banner(&readiness.errors) {
        sections.push(banner);
    }
    sections.push(format_gpu_card(&gpu_status.data));
    sections.push(format_current_job(&current_job.data));
    Ok(sections.join("\n\n"))
}
