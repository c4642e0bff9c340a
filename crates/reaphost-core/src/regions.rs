//! Region validity cache

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use reaphost_cloud::CloudInventory;

/// Caches, per region name, whether that name is a real, queryable region
///
/// Populated lazily on first query and retained for the process lifetime;
/// an invalid region is never re-validated. A failed region listing counts
/// as invalid and is cached the same way, so the round trip is made at most
/// once per distinct region string.
pub struct RegionValidator {
    cloud: Arc<dyn CloudInventory>,
    cache: RwLock<HashMap<String, bool>>,
}

impl RegionValidator {
    /// Create a validator backed by the given cloud inventory
    pub fn new(cloud: Arc<dyn CloudInventory>) -> Self {
        Self {
            cloud,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Whether `region` is a legitimate, queryable cloud region
    pub async fn is_valid(&self, region: &str) -> bool {
        if let Some(&known) = self.cache.read().await.get(region) {
            return known;
        }

        let valid = match self.cloud.describe_regions(region).await {
            Ok(regions) => regions.iter().any(|r| r == region),
            Err(e) => {
                warn!(region, error = %e, "region listing failed, treating region as invalid");
                false
            }
        };
        debug!(region, valid, "caching region validity");
        self.cache.write().await.insert(region.to_string(), valid);
        valid
    }
}
