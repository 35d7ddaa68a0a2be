//! Clean-logs command implementation

use crate::cli::context::{build_client, wait_loaded};
use crate::cli::output::format_notification;
use crate::cli::CleanLogsArgs;
use crate::config::MonitorConfig;
use crate::model::JobRunnerLog;
use crate::poller::{Poller, Subscription};
use crate::resource::ResourceDescriptor;
use crate::retention::{NotificationSeverity, RetentionMutation};
use crate::view::{should_offer_cleanup, LOG_RETENTION_DAYS};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How long to wait for the refreshed runner log after a cleanup.
const REFRESH_WAIT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupDecision {
    /// Within the retention window and not forced
    Skip,
    Confirm,
    Run,
}

pub fn decide(available_dates_len: usize, args: &CleanLogsArgs) -> CleanupDecision {
    if !args.force && !should_offer_cleanup(available_dates_len) {
        CleanupDecision::Skip
    } else if args.yes {
        CleanupDecision::Run
    } else {
        CleanupDecision::Confirm
    }
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub async fn run_clean_logs(config: &MonitorConfig, args: &CleanLogsArgs) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let cancel = CancellationToken::new();
    let Subscription { mut handle, task } = Poller::new(client.clone(), &config.polling).subscribe(
        ResourceDescriptor::<JobRunnerLog>::from_config(&config.polling),
        cancel.clone(),
    );

    wait_loaded(&mut handle).await;
    let before = handle.snapshot();
    if let Some(error) = &before.error {
        tracing::warn!(error = %error, "Runner log unavailable, log count unknown");
    }
    let before_len = before.data.available_dates.len();

    let proceed = match decide(before_len, args) {
        CleanupDecision::Skip => {
            println!(
                "{} days of runner logs kept, nothing older than {} days (use --force to run anyway)",
                before_len, LOG_RETENTION_DAYS
            );
            false
        }
        CleanupDecision::Confirm => confirm(
            &format!("Remove logs older than {} days?", LOG_RETENTION_DAYS),
            &mut io::stdin().lock(),
            &mut io::stdout(),
        )?,
        CleanupDecision::Run => true,
    };

    if proceed {
        let mutation = RetentionMutation::new(client, handle.invalidator());
        let notification = mutation.trigger().await;
        if notification.severity == NotificationSeverity::Error {
            cancel.cancel();
            let _ = task.await;
            anyhow::bail!("{}", notification.message);
        }
        println!("{}", format_notification(&notification));

        if tokio::time::timeout(REFRESH_WAIT, handle.changed()).await.is_ok() {
            println!(
                "{} days of runner logs remaining",
                handle.snapshot().data.available_dates.len()
            );
        }
    }

    cancel.cancel();
    let _ = task.await;
    Ok(())
}
