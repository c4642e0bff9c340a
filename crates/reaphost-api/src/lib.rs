//! reaphost-api: Orchestrator wire types
//!
//! Contains the host record, its lifecycle/transition enums, and the
//! paginated collection envelope shared by the client and the reaper core.

pub mod collection;
pub mod host;

pub use collection::{Collection, Pagination};
pub use host::{Host, HostState, Transitioning};
