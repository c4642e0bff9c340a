//! reaphost-core: Reconciliation loop and removal state machine
//!
//! Reconciles the orchestrator's host inventory against the lifecycle state
//! of the cloud instances backing those hosts: hosts whose instance is
//! confirmed terminated (or absent) are driven through
//! `active -> inactive -> removed -> purged`. A host whose cloud identity
//! cannot be confirmed is never touched.

pub mod config;
pub mod error;
pub mod reaper;
pub mod regions;
pub mod removal;
pub mod termination;

pub use config::ReaperConfig;
pub use error::CoreError;
pub use reaper::{CycleStats, Reaper};
pub use regions::RegionValidator;
pub use removal::HostRemover;
pub use termination::TerminationChecker;
