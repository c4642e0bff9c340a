//! Orchestrator capability trait consumed by the reaper core

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};

use reaphost_api::Host;

use crate::error::Result;
use crate::http::OrchestratorClient;

/// The slice of the orchestrator API the reaper depends on
#[async_trait]
pub trait OrchestratorApi: Send + Sync {
    /// Enumerate hosts whose agent connectivity matches `agent_state`,
    /// lazily following pagination
    fn hosts_by_agent_state(
        &self,
        agent_state: &str,
        page_size: u64,
    ) -> BoxStream<'_, Result<Host>>;

    /// Issue a named action against a host and wait for the resulting
    /// transition to settle; `Ok(None)` means the wait timed out
    async fn perform_action(&self, host: &Host, action: &str) -> Result<Option<Host>>;
}

#[async_trait]
impl OrchestratorApi for OrchestratorClient {
    fn hosts_by_agent_state(
        &self,
        agent_state: &str,
        page_size: u64,
    ) -> BoxStream<'_, Result<Host>> {
        let url = format!("/hosts?limit={page_size}&agentState={agent_state}");
        self.get_all(&url).boxed()
    }

    async fn perform_action(&self, host: &Host, action: &str) -> Result<Option<Host>> {
        OrchestratorClient::perform_action(self, host, action).await
    }
}
