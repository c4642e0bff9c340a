//! reaphost daemon
//!
//! Reconciles the orchestrator's host inventory against cloud reality:
//! hosts whose backing instance has been terminated are deactivated,
//! removed, and purged.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use eyre::eyre;
use tracing_subscriber::EnvFilter;

use reaphost_client::{OrchestratorClient, TransitionWait};
use reaphost_cloud::{CloudInventory, HttpCloudInventory};
use reaphost_core::Reaper;

mod config;

use config::{Config, Credentials};

#[derive(Parser)]
#[command(name = "reaphost")]
#[command(about = "Reaps orchestrator hosts whose cloud instances are terminated", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Compute actions without issuing them
    #[arg(long)]
    dry_run: bool,

    /// Run a single reconciliation cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    config.apply_overrides(
        std::env::var("REAPHOST_URL").ok(),
        std::env::var("REAPHOST_CLOUD_ENDPOINT").ok(),
    );
    if cli.dry_run {
        config.reaper.dry_run = true;
    }
    if cli.once {
        config.reaper.interval_secs = -1;
    }

    if config.orchestrator.url.is_empty() {
        return Err(eyre!(
            "orchestrator URL is not configured (set [orchestrator].url or REAPHOST_URL)"
        ));
    }
    if config.cloud.endpoint.is_empty() {
        return Err(eyre!(
            "cloud endpoint is not configured (set [cloud].endpoint or REAPHOST_CLOUD_ENDPOINT)"
        ));
    }
    let credentials = Credentials::from_env()?;

    let client = OrchestratorClient::new(
        &config.orchestrator.url,
        credentials.access_key,
        credentials.secret_key,
    )?
    .with_transition_wait(TransitionWait {
        timeout: Duration::from_secs(config.reaper.transition_timeout_secs),
        poll_interval: Duration::from_secs(config.reaper.transition_poll_interval_secs),
    });
    let cloud: Arc<dyn CloudInventory> = Arc::new(HttpCloudInventory::new(&config.cloud.endpoint)?);

    let reaper = Reaper::new(Arc::new(client), cloud, config.reaper);
    reaper.run().await;

    Ok(())
}
