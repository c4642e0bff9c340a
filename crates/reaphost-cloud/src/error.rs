//! Error types for cloud inventory lookups

use thiserror::Error;

/// Errors that can occur when querying the cloud inventory
///
/// A missing instance is not an error; `describe_instance` reports it as
/// `Ok(None)`.
#[derive(Error, Debug)]
pub enum CloudError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid endpoint URL
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// The instance id is not a well-formed cloud identifier
    #[error("malformed instance id: {0}")]
    MalformedInstanceId(String),

    /// Cloud API returned an error status
    #[error("cloud API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from server
        message: String,
    },
}
