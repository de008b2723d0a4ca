//! Request/response bodies for the directory API.

use serde::{Deserialize, Serialize};

use crate::model::StudentRecord;
use crate::query::{PageItem, QueryOutcome};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Profiles in the loaded roster.
    pub students: usize,
}

/// One page of directory results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub total_matches: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub items: Vec<StudentRecord>,
    pub window: Vec<PageItem>,
}

impl QueryResponse {
    pub fn from_outcome(outcome: QueryOutcome<'_>, page_size: usize) -> Self {
        Self {
            total_matches: outcome.total_matches,
            page: outcome.page,
            page_size,
            total_pages: outcome.total_pages,
            items: outcome.items.into_iter().cloned().collect(),
            window: outcome.window,
        }
    }
}

/// Error body for non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
