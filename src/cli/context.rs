//! Start-up plumbing shared by the subcommands.

use crate::cli::Cli;
use crate::client::{ApiClient, ResourceSource};
use crate::config::{MonitorConfig, PollingConfig};
use crate::poller::{Poller, ResourceHandle, Subscription};
use crate::resource::{Resource, ResourceDescriptor, ResourceState};
use crate::store::{FileStore, PersistedSelection};
use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Load configuration with CLI overrides
///
/// A missing config file is not an error; defaults apply.
pub fn load_config_with_overrides(cli: &Cli) -> anyhow::Result<MonitorConfig> {
    let mut config = if cli.config.exists() {
        MonitorConfig::load(Some(cli.config.as_path()))
            .with_context(|| format!("loading {}", cli.config.display()))?
    } else {
        MonitorConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref url) = cli.url {
        config.server.base_url = url.clone();
    }
    if let Some(ref log_level) = cli.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

pub fn build_client(config: &MonitorConfig) -> anyhow::Result<Arc<ApiClient>> {
    let client = ApiClient::new(&config.server).context("building HTTP client")?;
    Ok(Arc::new(client))
}

pub fn open_selection(config: &MonitorConfig) -> PersistedSelection {
    PersistedSelection::new(Arc::new(FileStore::new(&config.store.path)))
}

/// Poll one resource once (with the configured retry) and return its state.
pub async fn fetch_resource<S, T>(source: Arc<S>, config: &PollingConfig) -> ResourceState<T>
where
    S: ResourceSource,
    T: Resource,
{
    let cancel = CancellationToken::new();
    let Subscription { mut handle, task } = Poller::new(source, config)
        .subscribe(ResourceDescriptor::<T>::from_config(config), cancel.clone());

    wait_loaded(&mut handle).await;
    let state = handle.snapshot();

    cancel.cancel();
    let _ = task.await;
    state
}

/// Wait for the first response (or final failure) of a freshly started poller.
pub async fn wait_loaded<T: Clone>(handle: &mut ResourceHandle<T>) {
    while handle.snapshot().is_loading {
        if !handle.changed().await {
            break;
        }
    }
}
