//! Removal state machine for confirmed-terminated hosts

use std::sync::Arc;

use tracing::info;

use reaphost_api::{Host, HostState};
use reaphost_client::OrchestratorApi;

use crate::error::CoreError;

// Strict escalation order; each row is only applied when the host's current
// state equals its precondition.
const TRANSITIONS: &[(HostState, &str, HostState)] = &[
    (HostState::Active, "deactivate", HostState::Inactive),
    (HostState::Inactive, "remove", HostState::Removed),
    (HostState::Removed, "purge", HostState::Purged),
];

/// Drives one host through deactivate/remove/purge
///
/// Each step is re-evaluated against the freshest known snapshot; the
/// machine never skips ahead on the assumption that a previous step landed.
pub struct HostRemover {
    api: Arc<dyn OrchestratorApi>,
    dry_run: bool,
}

impl HostRemover {
    /// Create a remover issuing actions through the given orchestrator API
    pub fn new(api: Arc<dyn OrchestratorApi>, dry_run: bool) -> Self {
        Self { api, dry_run }
    }

    /// Advance a confirmed-terminated host as far as its transitions settle
    ///
    /// Returns the last known snapshot. If a transition wait yields no
    /// confirmed result the host is left as-is for this cycle and retried on
    /// a later pass. In dry-run mode the whole would-be action chain is
    /// logged and the host returned unchanged.
    ///
    /// # Errors
    /// Propagates orchestrator API failures.
    pub async fn advance(&self, host: Host) -> Result<Host, CoreError> {
        info!(host = %host.hostname, state = %host.state(), "removing terminated host");

        if self.dry_run {
            for action in Self::planned_actions(&host) {
                info!(host = %host.hostname, action, "dry run, action not issued");
            }
            return Ok(host);
        }

        let mut current = host;
        for (state, action, _) in TRANSITIONS {
            if current.state() != *state {
                continue;
            }
            info!(host = %current.hostname, action, "performing host action");
            match self.api.perform_action(&current, action).await? {
                Some(updated) => current = updated,
                None => {
                    info!(
                        host = %current.hostname,
                        action,
                        "transition unconfirmed, deferring host to a later cycle"
                    );
                    return Ok(current);
                }
            }
        }

        info!(host = %current.hostname, state = %current.state(), "removed terminated host");
        Ok(current)
    }

    /// The action chain a real run would issue, assuming every transition
    /// settles on its expected post-state
    ///
    /// A row whose action is not offered stops the chain, just as the no-op
    /// skip leaves a real run's state short of every later precondition.
    fn planned_actions(host: &Host) -> Vec<&'static str> {
        let mut plan = Vec::new();
        let mut state = host.state();
        for (precondition, action, post_state) in TRANSITIONS {
            if state != *precondition || host.action_url(action).is_none() {
                continue;
            }
            plan.push(*action);
            state = *post_state;
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::stream::BoxStream;

    use reaphost_client::Result as ClientResult;

    use super::*;

    // Records actions and applies each one's expected post-state, like the
    // real orchestrator would once the transition settles.
    struct FakeOrchestrator {
        performed: Mutex<Vec<(String, String)>>,
        // Actions that never settle within the wait.
        stuck_actions: Vec<String>,
    }

    impl FakeOrchestrator {
        fn new() -> Self {
            Self {
                performed: Mutex::new(Vec::new()),
                stuck_actions: Vec::new(),
            }
        }

        fn with_stuck_action(mut self, action: &str) -> Self {
            self.stuck_actions.push(action.to_string());
            self
        }

        fn performed(&self) -> Vec<(String, String)> {
            self.performed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OrchestratorApi for FakeOrchestrator {
        fn hosts_by_agent_state(
            &self,
            _agent_state: &str,
            _page_size: u64,
        ) -> BoxStream<'_, ClientResult<Host>> {
            unimplemented!("not used by the remover")
        }

        async fn perform_action(&self, host: &Host, action: &str) -> ClientResult<Option<Host>> {
            if !host.actions.contains_key(action) {
                return Ok(Some(host.clone()));
            }
            self.performed
                .lock()
                .unwrap()
                .push((host.hostname.clone(), action.to_string()));
            if self.stuck_actions.iter().any(|a| a == action) {
                return Ok(None);
            }
            let mut updated = host.clone();
            updated.state = match action {
                "deactivate" => "inactive",
                "remove" => "removed",
                "purge" => "purged",
                other => panic!("unexpected action {other}"),
            }
            .to_string();
            Ok(Some(updated))
        }
    }

    fn host_in_state(state: &str) -> Host {
        serde_json::from_value(serde_json::json!({
            "hostname": "h1",
            "state": state,
            "actions": {
                "deactivate": "http://o/v1/hosts/1h1?action=deactivate",
                "remove": "http://o/v1/hosts/1h1?action=remove",
                "purge": "http://o/v1/hosts/1h1?action=purge"
            }
        }))
        .unwrap()
    }

    fn actions_of(performed: &[(String, String)]) -> Vec<&str> {
        performed.iter().map(|(_, action)| action.as_str()).collect()
    }

    #[tokio::test]
    async fn active_host_runs_the_full_sequence() {
        let api = Arc::new(FakeOrchestrator::new());
        let remover = HostRemover::new(api.clone(), false);

        let result = remover.advance(host_in_state("active")).await.unwrap();
        assert_eq!(result.state(), HostState::Purged);
        assert_eq!(
            actions_of(&api.performed()),
            ["deactivate", "remove", "purge"]
        );
    }

    #[tokio::test]
    async fn inactive_host_skips_deactivate() {
        let api = Arc::new(FakeOrchestrator::new());
        let remover = HostRemover::new(api.clone(), false);

        let result = remover.advance(host_in_state("inactive")).await.unwrap();
        assert_eq!(result.state(), HostState::Purged);
        assert_eq!(actions_of(&api.performed()), ["remove", "purge"]);
    }

    #[tokio::test]
    async fn removed_host_only_purges() {
        let api = Arc::new(FakeOrchestrator::new());
        let remover = HostRemover::new(api.clone(), false);

        let result = remover.advance(host_in_state("removed")).await.unwrap();
        assert_eq!(result.state(), HostState::Purged);
        assert_eq!(actions_of(&api.performed()), ["purge"]);
    }

    #[tokio::test]
    async fn purged_host_is_returned_unchanged() {
        let api = Arc::new(FakeOrchestrator::new());
        let remover = HostRemover::new(api.clone(), false);

        let result = remover.advance(host_in_state("purged")).await.unwrap();
        assert_eq!(result.state(), HostState::Purged);
        assert!(api.performed().is_empty());
    }

    #[tokio::test]
    async fn unknown_state_is_left_untouched() {
        let api = Arc::new(FakeOrchestrator::new());
        let remover = HostRemover::new(api.clone(), false);

        let result = remover.advance(host_in_state("registering")).await.unwrap();
        assert_eq!(result.state, "registering");
        assert!(api.performed().is_empty());
    }

    #[tokio::test]
    async fn unconfirmed_transition_stops_the_machine() {
        let api = Arc::new(FakeOrchestrator::new().with_stuck_action("remove"));
        let remover = HostRemover::new(api.clone(), false);

        let result = remover.advance(host_in_state("active")).await.unwrap();
        // The remove never settled: no purge this cycle, and the last
        // confirmed snapshot is returned.
        assert_eq!(actions_of(&api.performed()), ["deactivate", "remove"]);
        assert_eq!(result.state(), HostState::Inactive);
    }

    #[tokio::test]
    async fn missing_action_is_skipped_not_an_error() {
        let api = Arc::new(FakeOrchestrator::new());
        let remover = HostRemover::new(api.clone(), false);

        let mut host = host_in_state("active");
        host.actions.remove("deactivate");
        let result = remover.advance(host).await.unwrap();
        // The no-op skip leaves the state at active, so later rows do not
        // match either.
        assert_eq!(result.state(), HostState::Active);
        assert!(api.performed().is_empty());
    }

    #[tokio::test]
    async fn dry_run_issues_no_actions() {
        let api = Arc::new(FakeOrchestrator::new());
        let remover = HostRemover::new(api.clone(), true);

        let result = remover.advance(host_in_state("active")).await.unwrap();
        assert_eq!(result.state(), HostState::Active);
        assert!(api.performed().is_empty());
    }

    #[test]
    fn dry_run_plan_covers_the_whole_remaining_chain() {
        assert_eq!(
            HostRemover::planned_actions(&host_in_state("active")),
            ["deactivate", "remove", "purge"]
        );
        assert_eq!(
            HostRemover::planned_actions(&host_in_state("inactive")),
            ["remove", "purge"]
        );
        assert_eq!(
            HostRemover::planned_actions(&host_in_state("removed")),
            ["purge"]
        );
        assert!(HostRemover::planned_actions(&host_in_state("purged")).is_empty());
    }

    #[test]
    fn dry_run_plan_stops_at_a_missing_action() {
        let mut host = host_in_state("active");
        host.actions.remove("remove");
        assert_eq!(HostRemover::planned_actions(&host), ["deactivate"]);
    }
}
