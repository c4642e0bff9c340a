//! Authenticated HTTP client for the orchestrator REST API

use std::time::Duration;

use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{debug, info};
use url::Url;

use reaphost_api::{Collection, Host};

use crate::error::{ClientError, Result};

/// Poll settings for waiting out a server-side transition
#[derive(Debug, Clone, Copy)]
pub struct TransitionWait {
    /// Give up after this long
    pub timeout: Duration,
    /// Refetch the host at this interval while it is transitioning
    pub poll_interval: Duration,
}

impl Default for TransitionWait {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(3),
        }
    }
}

/// HTTP client for the orchestrator API
///
/// Every request carries HTTP basic auth. Relative URLs are resolved by
/// concatenation onto the configured base, so a base ending in a version
/// path segment (for example `…/v1`) is preserved.
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    client: Client,
    base_url: String,
    access_key: String,
    secret_key: String,
    wait: TransitionWait,
}

impl OrchestratorClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn new(
        base_url: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url)?;
        Ok(Self {
            client: Client::new(),
            base_url,
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            wait: TransitionWait::default(),
        })
    }

    /// Replace the underlying `reqwest::Client`
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Override the transition poll settings
    #[must_use]
    pub fn with_transition_wait(mut self, wait: TransitionWait) -> Self {
        self.wait = wait;
        self
    }

    /// Resolve a possibly-relative URL against the configured base
    fn url(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(Url::parse(&format!("{}{}", self.base_url, url))?)
            }
            Err(e) => Err(ClientError::Url(e)),
        }
    }

    /// Perform an authenticated GET and deserialize the response
    ///
    /// # Errors
    /// Returns an error if the request fails, the server returns a
    /// non-success status, or the body does not decode.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let url = self.url(url)?;
        let response = self
            .client
            .get(url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, message });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Perform an authenticated POST and deserialize the response
    ///
    /// Action responses are bare resource objects, so the body decodes
    /// directly into `T`.
    ///
    /// # Errors
    /// Returns an error if the request fails, the server returns a
    /// non-success status, or the body does not decode.
    pub async fn post<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let url = self.url(url)?;
        let response = self
            .client
            .post(url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, message });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Lazily enumerate every item of a paginated collection
    ///
    /// Follows the `pagination.next` URL embedded in each page until absent,
    /// yielding each page's `data` items in order. The next page is only
    /// fetched once the current page is exhausted, so a consumer that stops
    /// early never triggers further requests.
    pub fn get_all<'a, T>(&'a self, url: &str) -> impl Stream<Item = Result<T>> + 'a
    where
        T: DeserializeOwned + Send + 'a,
    {
        let first = Some(url.to_string());
        stream::try_unfold(first, move |next| async move {
            let Some(url) = next else {
                return Ok::<_, ClientError>(None);
            };
            let page: Collection<T> = self.get(&url).await?;
            let next = page.pagination.and_then(|p| p.next);
            let items = stream::iter(page.data.into_iter().map(Ok));
            Ok(Some((items, next)))
        })
        .try_flatten()
    }

    /// Issue a named action against a host and wait for it to settle
    ///
    /// A host that does not offer the action is returned unchanged; the
    /// orchestrator only discloses the actions that are currently legal, so
    /// a missing entry is a no-op, not an error.
    ///
    /// Returns `Ok(None)` if the resulting transition did not settle within
    /// the configured timeout.
    ///
    /// # Errors
    /// Returns an error if the action POST or a transition poll fails.
    pub async fn perform_action(&self, host: &Host, action: &str) -> Result<Option<Host>> {
        let Some(action_url) = host.action_url(action) else {
            debug!(host = %host.hostname, action, "action not offered, skipping");
            return Ok(Some(host.clone()));
        };
        let updated: Host = self.post(action_url).await?;
        self.wait_for_transition(updated).await
    }

    /// Poll a host's self link until its transition settles
    ///
    /// Returns `Ok(None)` when the timeout elapses while the host is still
    /// transitioning, or when the host carries no self link to poll; either
    /// way there is no confirmed result this cycle.
    ///
    /// # Errors
    /// Returns an error if a poll request fails.
    pub async fn wait_for_transition(&self, host: Host) -> Result<Option<Host>> {
        let deadline = Instant::now() + self.wait.timeout;
        let mut host = host;
        while host.is_transitioning() {
            let Some(self_link) = host.self_link().map(str::to_owned) else {
                info!(host = %host.hostname, "transitioning host has no self link to poll");
                return Ok(None);
            };
            if Instant::now() >= deadline {
                info!(host = %host.hostname, "transition did not settle before timeout");
                return Ok(None);
            }
            tokio::time::sleep(self.wait.poll_interval).await;
            host = self.get(&self_link).await?;
        }
        Ok(Some(host))
    }
}
