//! Host record as reported by the orchestrator inventory API

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A host record from the orchestrator's inventory.
///
/// Only the fields the reaper consumes are typed; everything else in the
/// payload is ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    /// Display identifier, used in log lines
    #[serde(default)]
    pub hostname: String,
    /// Lifecycle state as reported on the wire
    #[serde(default)]
    pub state: String,
    /// Operator-supplied metadata, including cloud instance id and placement
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Symbolic action name to URL; a missing entry means the transition is
    /// not currently offered for this host
    #[serde(default)]
    pub actions: HashMap<String, String>,
    /// Symbolic link name to URL; `self` is polled for transition settling
    #[serde(default)]
    pub links: HashMap<String, String>,
    /// Whether a requested state change has settled server-side
    #[serde(default)]
    pub transitioning: Transitioning,
    /// Agent connectivity as reported by the orchestrator
    #[serde(default, rename = "agentState")]
    pub agent_state: Option<String>,
}

impl Host {
    /// Typed view of the wire state string
    #[must_use]
    pub fn state(&self) -> HostState {
        self.state.parse().unwrap_or(HostState::Other)
    }

    /// Look up a label value
    #[must_use]
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    /// URL for a named action, if the orchestrator currently offers it
    #[must_use]
    pub fn action_url(&self, action: &str) -> Option<&str> {
        self.actions.get(action).map(String::as_str)
    }

    /// The host's own resource URL, used for transition polling
    #[must_use]
    pub fn self_link(&self) -> Option<&str> {
        self.links.get("self").map(String::as_str)
    }

    /// Whether a requested state change is still settling
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transitioning == Transitioning::Yes
    }
}

/// Orchestrator-owned host lifecycle states.
///
/// Observed, never invented, by the reaper: anything it does not recognize
/// maps to `Other` and is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Active,
    Inactive,
    Removed,
    Purged,
    /// Any state the reaper does not act on
    Other,
}

impl FromStr for HostState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "active" => HostState::Active,
            "inactive" => HostState::Inactive,
            "removed" => HostState::Removed,
            "purged" => HostState::Purged,
            _ => HostState::Other,
        })
    }
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HostState::Active => "active",
            HostState::Inactive => "inactive",
            HostState::Removed => "removed",
            HostState::Purged => "purged",
            HostState::Other => "other",
        };
        f.write_str(s)
    }
}

/// Wire value of the `transitioning` field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transitioning {
    /// A requested change has not yet settled
    Yes,
    /// No change in flight
    #[default]
    No,
    /// The last requested change failed server-side
    Error,
    /// Any value this client does not recognize
    #[serde(other)]
    Unknown,
}
