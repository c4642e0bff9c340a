//! Cloud inventory trait

use async_trait::async_trait;

use crate::error::CloudError;
use crate::types::InstanceDescription;

/// Read-only view of the cloud provider's compute inventory
#[async_trait]
pub trait CloudInventory: Send + Sync {
    /// Look up one instance by id within a region
    ///
    /// Returns `Ok(None)` when no instance with that id exists.
    ///
    /// # Errors
    /// Returns `CloudError::MalformedInstanceId` for ids the provider
    /// rejects outright, or a transport/API error otherwise.
    async fn describe_instance(
        &self,
        region: &str,
        instance_id: &str,
    ) -> Result<Option<InstanceDescription>, CloudError>;

    /// List the provider's region names, queried through the candidate
    /// region's own endpoint
    ///
    /// An unqueryable region string fails the call itself, which is how a
    /// bogus region is detected.
    ///
    /// # Errors
    /// Returns an error if the region endpoint is unreachable or rejects
    /// the request.
    async fn describe_regions(&self, region: &str) -> Result<Vec<String>, CloudError>;
}
