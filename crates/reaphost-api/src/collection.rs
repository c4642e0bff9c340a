//! Paginated collection envelope returned by orchestrator list endpoints

use serde::{Deserialize, Serialize};

/// One page of a list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection<T> {
    /// Items on this page
    // Spelled out so the derive does not put a `T: Default` bound on the
    // `Deserialize` impl; item types carry no `Default`.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Pagination links, absent on unpaginated responses
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Pagination links for a collection page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    /// URL of the next page; absent on the last page
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> Collection<T> {
    /// URL of the next page, if any
    #[must_use]
    pub fn next_url(&self) -> Option<&str> {
        self.pagination.as_ref()?.next.as_deref()
    }
}
