//! Directory query engine: filter, sort, paginate, and the pagination window.
//!
//! Every stage is a pure function over borrowed records:
//!
//! ```text
//! roster ──filter──▶ matches ──sort──▶ ordered ──paginate──▶ page items
//!                                          │
//!                                          └──total_pages──▶ pagination_window
//! ```
//!
//! [`run`] composes the stages for one directory view.

pub mod filter;
pub mod paginate;
pub mod sort;
pub mod window;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::StudentRecord;

pub use filter::{Filter, filter};
pub use paginate::{Page, paginate, total_pages};
pub use sort::{collate, sort_students};
pub use window::{PageItem, pagination_window};

/// Profiles per page when a request does not choose.
pub const DEFAULT_PAGE_SIZE: usize = 24;

/// Sort order for directory results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// A–Z on the full display name.
    #[default]
    FirstAz,
    /// Z–A on the full display name.
    FirstZa,
    /// A–Z on the last name token.
    LastAz,
    /// Z–A on the last name token.
    LastZa,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::FirstAz,
        SortKey::FirstZa,
        SortKey::LastAz,
        SortKey::LastZa,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::FirstAz => "first_az",
            SortKey::FirstZa => "first_za",
            SortKey::LastAz => "last_az",
            SortKey::LastZa => "last_za",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised sort key string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key {0:?} (expected first_az, first_za, last_az or last_za)")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| ParseSortKeyError(s.to_string()))
    }
}

/// Filter, sort and pagination request for one directory view.
///
/// Empty selections disable their filter. Scalar selections match by exact
/// equality; list selections require every term to match some entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Case-insensitive substring of the display name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub class_years: BTreeSet<u16>,
    #[serde(default)]
    pub majors: BTreeSet<String>,
    #[serde(default)]
    pub minors: BTreeSet<String>,
    #[serde(default)]
    pub dorms: BTreeSet<String>,
    #[serde(default)]
    pub hometowns: BTreeSet<String>,

    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub clubs: Vec<String>,
    #[serde(default)]
    pub sports: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,

    #[serde(default)]
    pub sort: SortKey,

    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: usize,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Viewer id left out of the results.
    #[serde(default)]
    pub exclude_id: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            class_years: BTreeSet::new(),
            majors: BTreeSet::new(),
            minors: BTreeSet::new(),
            dorms: BTreeSet::new(),
            hometowns: BTreeSet::new(),
            courses: Vec::new(),
            companies: Vec::new(),
            clubs: Vec::new(),
            sports: Vec::new(),
            interests: Vec::new(),
            sort: SortKey::default(),
            page: default_page(),
            page_size: default_page_size(),
            exclude_id: None,
        }
    }
}

impl QueryParams {
    /// Number of filter categories with a non-empty selection.
    ///
    /// The free-text name filter is not a category and is not counted.
    pub fn active_filter_count(&self) -> usize {
        [
            self.class_years.is_empty(),
            self.majors.is_empty(),
            self.minors.is_empty(),
            self.dorms.is_empty(),
            self.hometowns.is_empty(),
            self.courses.is_empty(),
            self.companies.is_empty(),
            self.clubs.is_empty(),
            self.sports.is_empty(),
            self.interests.is_empty(),
        ]
        .into_iter()
        .filter(|empty| !empty)
        .count()
    }

    /// Drop every filter selection and the name filter.
    pub fn clear_filters(&mut self) {
        self.name.clear();
        self.class_years.clear();
        self.majors.clear();
        self.minors.clear();
        self.dorms.clear();
        self.hometowns.clear();
        self.courses.clear();
        self.companies.clear();
        self.clubs.clear();
        self.sports.clear();
        self.interests.clear();
    }
}

/// Result of one directory query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome<'a> {
    /// Matches before pagination.
    pub total_matches: usize,
    /// Page actually shown, clamped to `1..=total_pages` (1 when empty).
    pub page: usize,
    pub total_pages: usize,
    pub items: Vec<&'a StudentRecord>,
    pub window: Vec<PageItem>,
}

/// Filter, sort and paginate `students` for one view.
///
/// An out-of-range `params.page` is clamped before slicing, so a non-empty
/// result always shows a non-empty page.
pub fn run<'a>(
    students: &'a [StudentRecord],
    params: &QueryParams,
    sibling_count: usize,
) -> QueryOutcome<'a> {
    let mut matches = filter(students, params);
    sort_students(&mut matches, params.sort);

    let total_pages = total_pages(matches.len(), params.page_size);
    let page = params.page.clamp(1, total_pages.max(1));
    let Page { items, .. } = paginate(&matches, page, params.page_size);
    let items = items.to_vec();
    let window = pagination_window(page, total_pages, sibling_count);

    debug!(
        roster = students.len(),
        matches = matches.len(),
        page,
        total_pages,
        sort = %params.sort,
        "directory query"
    );

    QueryOutcome {
        total_matches: matches.len(),
        page,
        total_pages,
        items,
        window,
    }
}
