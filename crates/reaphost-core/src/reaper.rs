//! The reconciliation loop

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tracing::{error, info, warn};

use reaphost_api::Host;
use reaphost_client::OrchestratorApi;
use reaphost_cloud::CloudInventory;

use crate::config::ReaperConfig;
use crate::error::CoreError;
use crate::regions::RegionValidator;
use crate::removal::HostRemover;
use crate::termination::TerminationChecker;

// Candidate sets, pulled in this order each cycle. A host appearing in both
// is processed twice; the state machine re-reads current state, so the
// second pass is a no-op.
const CANDIDATE_AGENT_STATES: &[&str] = &["reconnecting", "disconnected"];

/// Counters for one reconciliation cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Candidate hosts examined
    pub examined: u64,
    /// Hosts confirmed terminated and advanced
    pub reaped: u64,
    /// Hosts whose processing failed
    pub failed: u64,
}

/// The top-level reconciliation scheduler
///
/// Periodically pulls candidate host sets from the orchestrator, filters
/// them through the termination check, and hands confirmed-terminated hosts
/// to the removal state machine. Failures are isolated per host; only a
/// failure of a candidate stream itself aborts the remainder of a cycle,
/// and no failure ever stops the loop.
pub struct Reaper {
    api: Arc<dyn OrchestratorApi>,
    checker: TerminationChecker,
    remover: HostRemover,
    config: ReaperConfig,
}

impl Reaper {
    /// Wire up a reaper from its two upstream capabilities
    pub fn new(
        api: Arc<dyn OrchestratorApi>,
        cloud: Arc<dyn CloudInventory>,
        config: ReaperConfig,
    ) -> Self {
        let regions = Arc::new(RegionValidator::new(cloud.clone()));
        let checker = TerminationChecker::new(
            cloud,
            regions,
            config.instance_id_label.clone(),
            config.availability_zone_label.clone(),
        );
        let remover = HostRemover::new(api.clone(), config.dry_run);
        Self {
            api,
            checker,
            remover,
            config,
        }
    }

    /// Run the reconciliation loop
    ///
    /// Repeats every `interval_secs` seconds forever; a negative interval
    /// runs exactly one cycle and returns. Cycle errors are logged, never
    /// fatal.
    pub async fn run(&self) {
        info!("host reaper started");
        loop {
            match self.reap_cycle().await {
                Ok(stats) => info!(
                    examined = stats.examined,
                    reaped = stats.reaped,
                    failed = stats.failed,
                    "reap cycle complete"
                ),
                Err(e) => error!(error = %e, "reap cycle failed"),
            }
            if self.config.interval_secs < 0 {
                break;
            }
            #[allow(clippy::cast_sign_loss)]
            tokio::time::sleep(Duration::from_secs(self.config.interval_secs as u64)).await;
        }
        info!("host reaper exited");
    }

    /// Run exactly one cycle, surfacing its result to the caller
    ///
    /// # Errors
    /// Returns the error that aborted the cycle, if any.
    pub async fn run_once(&self) -> Result<CycleStats, CoreError> {
        self.reap_cycle().await
    }

    async fn reap_cycle(&self) -> Result<CycleStats, CoreError> {
        info!("reaping terminated cloud hosts");
        if self.config.dry_run {
            warn!("*** dry run - no changes will be applied");
        }

        let mut stats = CycleStats::default();
        for agent_state in CANDIDATE_AGENT_STATES {
            let mut hosts = self
                .api
                .hosts_by_agent_state(agent_state, self.config.page_size);
            while let Some(host) = hosts.next().await {
                // A broken candidate stream aborts the rest of the cycle.
                let host = host?;
                stats.examined += 1;
                match self.process_host(&host).await {
                    Ok(true) => stats.reaped += 1,
                    Ok(false) => {}
                    Err(e) => {
                        stats.failed += 1;
                        error!(host = %host.hostname, error = %e, "failed to process host");
                    }
                }
            }
        }
        Ok(stats)
    }

    /// Check one candidate and advance it if its termination is confirmed
    async fn process_host(&self, host: &Host) -> Result<bool, CoreError> {
        if !self.checker.is_terminated(host).await? {
            return Ok(false);
        }
        self.remover.advance(host.clone()).await?;
        Ok(true)
    }
}
