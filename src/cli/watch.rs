//! Watch command implementation

use crate::cli::context::{build_client, open_selection};
use crate::cli::output::render_dashboard;
use crate::cli::WatchArgs;
use crate::config::MonitorConfig;
use crate::dashboard::Dashboard;
use crate::store::PersistedSelection;
use crate::view::JobFilter;
use std::io::Write;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Run the live dashboard until Ctrl-C.
pub async fn run_watch(config: &MonitorConfig, args: &WatchArgs) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let selection = open_selection(config);
    if let Some(index) = args.log_index {
        selection.save(index);
    }
    let filter = args.filter.to_filter();

    let dashboard = Dashboard::start(client, &config.polling);
    let mut updates = dashboard.subscribe_updates();
    tracing::info!(base_url = %config.server.base_url, "Watching scheduler");

    draw(&dashboard, &filter, &selection)?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
            update = updates.recv() => match update {
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    // Several resources often land together; draw once.
                    while let Ok(_) | Err(TryRecvError::Lagged(_)) = updates.try_recv() {}
                    draw(&dashboard, &filter, &selection)?;
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    dashboard.shutdown().await;
    Ok(())
}

fn draw(
    dashboard: &Dashboard,
    filter: &JobFilter,
    selection: &PersistedSelection,
) -> std::io::Result<()> {
    let snapshot = dashboard.snapshot();
    let log_index = selection.load(&snapshot.runner_log.data.available_dates);
    let frame = render_dashboard(&snapshot, filter, log_index);

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}{}", CLEAR_SCREEN, frame)?;
    stdout.flush()
}
