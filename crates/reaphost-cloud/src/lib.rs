//! reaphost-cloud: Cloud inventory capability
//!
//! Provides the `CloudInventory` trait the reaper core uses to confirm an
//! instance's lifecycle state, plus an HTTP implementation against
//! region-scoped compute endpoints.

pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::CloudError;
pub use http::HttpCloudInventory;
pub use traits::CloudInventory;
pub use types::{InstanceDescription, InstanceLifecycle};
