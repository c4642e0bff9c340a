//! Termination verification for candidate hosts

use std::sync::Arc;

use tracing::{info, warn};

use reaphost_api::Host;
use reaphost_cloud::{CloudError, CloudInventory};

use crate::error::CoreError;
use crate::regions::RegionValidator;

/// Decides whether a host's backing cloud instance is confirmed terminated
///
/// The safety invariant of the whole reaper lives here: absence of proof is
/// never proof of termination. A host that cannot be tied to a cloud
/// instance in a valid region is reported as not terminated, whatever its
/// actual cloud state.
pub struct TerminationChecker {
    cloud: Arc<dyn CloudInventory>,
    regions: Arc<RegionValidator>,
    instance_id_label: String,
    availability_zone_label: String,
}

impl TerminationChecker {
    /// Create a checker reading the given host labels
    pub fn new(
        cloud: Arc<dyn CloudInventory>,
        regions: Arc<RegionValidator>,
        instance_id_label: impl Into<String>,
        availability_zone_label: impl Into<String>,
    ) -> Self {
        Self {
            cloud,
            regions,
            instance_id_label: instance_id_label.into(),
            availability_zone_label: availability_zone_label.into(),
        }
    }

    /// Whether the host's backing instance is confirmed terminated or absent
    ///
    /// # Errors
    /// Propagates cloud lookup failures other than a malformed instance id;
    /// the loop isolates those at the host boundary.
    pub async fn is_terminated(&self, host: &Host) -> Result<bool, CoreError> {
        let (Some(instance_id), Some(zone)) = (
            host.label(&self.instance_id_label),
            host.label(&self.availability_zone_label),
        ) else {
            info!(
                host = %host.hostname,
                "host is not labelled with cloud instance id and placement, skipping"
            );
            return Ok(false);
        };

        // Availability-zone-to-region convention: drop the zone suffix.
        let region = match zone.char_indices().next_back() {
            Some((idx, _)) => &zone[..idx],
            None => "",
        };
        if region.is_empty() || !self.regions.is_valid(region).await {
            warn!(
                host = %host.hostname,
                availability_zone = zone,
                "host is labelled with an invalid availability zone, skipping"
            );
            return Ok(false);
        }

        match self.cloud.describe_instance(region, instance_id).await {
            Ok(None) => Ok(true),
            Ok(Some(instance)) if instance.lifecycle.is_terminated() => Ok(true),
            Ok(Some(instance)) => {
                info!(
                    host = %host.hostname,
                    lifecycle = %instance.lifecycle,
                    "host is reconnecting but not terminated in the cloud, skipping"
                );
                Ok(false)
            }
            Err(CloudError::MalformedInstanceId(_)) => {
                info!(
                    host = %host.hostname,
                    instance_id,
                    "host has a malformed cloud instance id label, skipping"
                );
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
