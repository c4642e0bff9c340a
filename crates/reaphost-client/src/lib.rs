//! reaphost-client: HTTP client for the orchestrator REST API
//!
//! Provides the authenticated client used to enumerate hosts and drive
//! their lifecycle actions, plus the `OrchestratorApi` trait the reaper
//! core consumes.
//!
//! # Example
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use reaphost_api::Host;
//! use reaphost_client::OrchestratorClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OrchestratorClient::new(
//!     "https://orchestrator.example.com/v1",
//!     "access-key",
//!     "secret-key",
//! )?;
//!
//! let mut hosts = std::pin::pin!(client.get_all::<Host>("/hosts?agentState=reconnecting"));
//! while let Some(host) = hosts.try_next().await? {
//!     println!("{}: {}", host.hostname, host.state);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod http;

pub use api::OrchestratorApi;
pub use error::{ClientError, Result};
pub use http::{OrchestratorClient, TransitionWait};
