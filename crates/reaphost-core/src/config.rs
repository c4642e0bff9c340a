//! Reaper configuration

use serde::{Deserialize, Serialize};

/// Settings for the reconciliation loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaperConfig {
    /// Seconds between reconciliation cycles; negative means run exactly once
    #[serde(default = "default_interval_secs")]
    pub interval_secs: i64,
    /// Hosts requested per list page
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Compute actions without issuing them
    #[serde(default)]
    pub dry_run: bool,
    /// Host label carrying the cloud instance id
    #[serde(default = "default_instance_id_label")]
    pub instance_id_label: String,
    /// Host label carrying the availability-zone placement
    #[serde(default = "default_availability_zone_label")]
    pub availability_zone_label: String,
    /// Seconds to wait for a host transition to settle
    #[serde(default = "default_transition_timeout_secs")]
    pub transition_timeout_secs: u64,
    /// Seconds between transition polls
    #[serde(default = "default_transition_poll_interval_secs")]
    pub transition_poll_interval_secs: u64,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            page_size: default_page_size(),
            dry_run: false,
            instance_id_label: default_instance_id_label(),
            availability_zone_label: default_availability_zone_label(),
            transition_timeout_secs: default_transition_timeout_secs(),
            transition_poll_interval_secs: default_transition_poll_interval_secs(),
        }
    }
}

fn default_interval_secs() -> i64 {
    30
}

fn default_page_size() -> u64 {
    100
}

fn default_instance_id_label() -> String {
    "cloud.instance_id".to_string()
}

fn default_availability_zone_label() -> String {
    "cloud.availability_zone".to_string()
}

fn default_transition_timeout_secs() -> u64 {
    30
}

fn default_transition_poll_interval_secs() -> u64 {
    3
}
