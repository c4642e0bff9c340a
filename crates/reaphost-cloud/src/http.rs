//! HTTP implementation of the cloud inventory against region-scoped endpoints

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::CloudError;
use crate::traits::CloudInventory;
use crate::types::InstanceDescription;

// Error code the provider uses for ids that are not well-formed.
const MALFORMED_ID_CODE: &str = "InvalidInstanceID.Malformed";

#[derive(Debug, Deserialize)]
struct RegionsResponse {
    regions: Vec<RegionRecord>,
}

#[derive(Debug, Deserialize)]
struct RegionRecord {
    region_name: String,
}

/// Cloud inventory client against per-region compute endpoints
///
/// The endpoint template carries a `{region}` placeholder that is
/// substituted per call, mirroring providers that expose one API host per
/// region.
#[derive(Debug, Clone)]
pub struct HttpCloudInventory {
    client: Client,
    endpoint_template: String,
}

impl HttpCloudInventory {
    /// Create a new inventory client
    ///
    /// # Errors
    /// Returns an error if the template does not produce a valid URL.
    pub fn new(endpoint_template: impl Into<String>) -> Result<Self, CloudError> {
        let endpoint_template = endpoint_template.into();
        Url::parse(&endpoint_template.replace("{region}", "region-probe"))?;
        Ok(Self {
            client: Client::new(),
            endpoint_template,
        })
    }

    /// Replace the underlying `reqwest::Client`
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self, region: &str) -> String {
        self.endpoint_template.replace("{region}", region)
    }
}

#[async_trait]
impl CloudInventory for HttpCloudInventory {
    async fn describe_instance(
        &self,
        region: &str,
        instance_id: &str,
    ) -> Result<Option<InstanceDescription>, CloudError> {
        let url = format!("{}/instances/{instance_id}", self.endpoint(region));
        debug!(region, instance_id, "describing cloud instance");
        let response = self.client.get(&url).send().await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::BAD_REQUEST => {
                let message = response.text().await.unwrap_or_default();
                if message.contains(MALFORMED_ID_CODE) {
                    Err(CloudError::MalformedInstanceId(instance_id.to_string()))
                } else {
                    Err(CloudError::Api {
                        status: 400,
                        message,
                    })
                }
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(CloudError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn describe_regions(&self, region: &str) -> Result<Vec<String>, CloudError> {
        let url = format!("{}/regions", self.endpoint(region));
        debug!(region, "listing cloud regions");
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(CloudError::Api { status, message });
        }

        let listing: RegionsResponse = response.json().await?;
        Ok(listing
            .regions
            .into_iter()
            .map(|r| r.region_name)
            .collect())
    }
}
