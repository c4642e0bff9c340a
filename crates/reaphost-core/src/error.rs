//! Core error types for the reaper

use thiserror::Error;

use reaphost_client::ClientError;
use reaphost_cloud::CloudError;

/// Errors that can abort the processing of a host or a cycle
#[derive(Error, Debug)]
pub enum CoreError {
    /// Orchestrator API call failed
    #[error("orchestrator API error: {0}")]
    Orchestrator(#[from] ClientError),

    /// Cloud inventory lookup failed
    #[error("cloud inventory error: {0}")]
    Cloud(#[from] CloudError),
}
