//! Cloud instance description types

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Current view of one cloud instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDescription {
    /// Cloud instance identifier
    pub id: String,
    /// Reported lifecycle state
    pub lifecycle: InstanceLifecycle,
}

/// Cloud instance lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceLifecycle {
    Pending,
    Running,
    ShuttingDown,
    Stopping,
    Stopped,
    Terminated,
    /// Any state this client does not recognize
    #[serde(other)]
    Other,
}

impl InstanceLifecycle {
    /// Only `Terminated` counts; a stopping or shutting-down instance is
    /// still not proof of termination
    #[must_use]
    pub fn is_terminated(self) -> bool {
        self == InstanceLifecycle::Terminated
    }
}

impl FromStr for InstanceLifecycle {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pending" => InstanceLifecycle::Pending,
            "running" => InstanceLifecycle::Running,
            "shutting-down" => InstanceLifecycle::ShuttingDown,
            "stopping" => InstanceLifecycle::Stopping,
            "stopped" => InstanceLifecycle::Stopped,
            "terminated" => InstanceLifecycle::Terminated,
            _ => InstanceLifecycle::Other,
        })
    }
}

impl fmt::Display for InstanceLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstanceLifecycle::Pending => "pending",
            InstanceLifecycle::Running => "running",
            InstanceLifecycle::ShuttingDown => "shutting-down",
            InstanceLifecycle::Stopping => "stopping",
            InstanceLifecycle::Stopped => "stopped",
            InstanceLifecycle::Terminated => "terminated",
            InstanceLifecycle::Other => "other",
        };
        f.write_str(s)
    }
}
