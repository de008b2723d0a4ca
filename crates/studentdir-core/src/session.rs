//! Per-viewer directory state.
//!
//! A [`DirectorySession`] owns the [`QueryParams`] for one viewer and applies
//! the directory's interaction rules: every filter, sort or page-size change
//! returns to page 1, and page navigation stays within the last result.

use tracing::debug;

use studentdir_config::DirectoryConfig;

use crate::query::{self, QueryOutcome, QueryParams, SortKey};
use crate::roster::Roster;

/// Errors from session updates.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("page size {size} is not one of the offered sizes {options:?}")]
    UnsupportedPageSize { size: usize, options: Vec<usize> },
}

/// String-valued exact-match filter categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarFilter {
    Major,
    Minor,
    Dorm,
    Hometown,
}

/// Substring filter categories where every term must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    Course,
    Company,
    Club,
    Sport,
    Interest,
}

#[derive(Debug, Clone)]
pub struct DirectorySession {
    params: QueryParams,
    filters_open: bool,
    page_size_options: Vec<usize>,
    sibling_count: usize,
    total_pages: usize,
}

impl DirectorySession {
    pub fn new(config: &DirectoryConfig) -> Self {
        Self {
            params: QueryParams {
                page_size: config.default_page_size,
                ..Default::default()
            },
            filters_open: false,
            page_size_options: config.page_size_options.clone(),
            sibling_count: config.sibling_count,
            total_pages: 0,
        }
    }

    /// Exclude the viewer's own profile from results.
    pub fn with_viewer(mut self, viewer_id: impl Into<String>) -> Self {
        self.params.exclude_id = Some(viewer_id.into());
        self
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn page(&self) -> usize {
        self.params.page
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn filters_open(&self) -> bool {
        self.filters_open
    }

    pub fn toggle_filters(&mut self) {
        self.filters_open = !self.filters_open;
    }

    pub fn active_filter_count(&self) -> usize {
        self.params.active_filter_count()
    }

    /// Apply `f` to the params and return to page 1.
    fn change(&mut self, f: impl FnOnce(&mut QueryParams)) {
        f(&mut self.params);
        self.params.page = 1;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.change(|p| p.name = name);
    }

    pub fn toggle_class_year(&mut self, year: u16) {
        self.change(|p| {
            if !p.class_years.remove(&year) {
                p.class_years.insert(year);
            }
        });
    }

    /// Add `value` to the selection, or remove it if already selected.
    pub fn toggle(&mut self, filter: ScalarFilter, value: &str) {
        self.change(|p| {
            let set = match filter {
                ScalarFilter::Major => &mut p.majors,
                ScalarFilter::Minor => &mut p.minors,
                ScalarFilter::Dorm => &mut p.dorms,
                ScalarFilter::Hometown => &mut p.hometowns,
            };
            if !set.remove(value) {
                set.insert(value.to_string());
            }
        });
    }

    /// Replace the search terms of one list filter. Blank terms are dropped.
    pub fn set_terms<I, S>(&mut self, filter: ListFilter, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| !t.trim().is_empty())
            .collect();
        self.change(|p| {
            let slot = match filter {
                ListFilter::Course => &mut p.courses,
                ListFilter::Company => &mut p.companies,
                ListFilter::Club => &mut p.clubs,
                ListFilter::Sport => &mut p.sports,
                ListFilter::Interest => &mut p.interests,
            };
            *slot = terms;
        });
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.change(|p| p.sort = sort);
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<(), SessionError> {
        if !self.page_size_options.contains(&size) {
            return Err(SessionError::UnsupportedPageSize {
                size,
                options: self.page_size_options.clone(),
            });
        }
        self.change(|p| p.page_size = size);
        Ok(())
    }

    /// Reset every filter and the sort order. The page size is kept.
    pub fn clear_all(&mut self) {
        self.change(|p| {
            p.clear_filters();
            p.sort = SortKey::FirstAz;
        });
    }

    /// Jump to `page`, clamped to the pages of the last query.
    pub fn go_to(&mut self, page: usize) {
        self.params.page = page.clamp(1, self.total_pages.max(1));
    }

    pub fn next_page(&mut self) {
        self.go_to(self.params.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.go_to(self.params.page.saturating_sub(1));
    }

    /// Run the engine over `roster` and remember the page count.
    pub fn query<'a>(&mut self, roster: &'a Roster) -> QueryOutcome<'a> {
        let outcome = query::run(roster.students(), &self.params, self.sibling_count);
        self.total_pages = outcome.total_pages;
        self.params.page = outcome.page;
        debug!(
            active_filters = self.active_filter_count(),
            page = outcome.page,
            total_pages = outcome.total_pages,
            "session query"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentRecord;
    use pretty_assertions::assert_eq;

    fn config() -> DirectoryConfig {
        DirectoryConfig {
            default_page_size: 2,
            page_size_options: vec![2, 4],
            max_page_size: 10,
            sibling_count: 1,
        }
    }

    fn roster(n: usize) -> Roster {
        let students: Vec<StudentRecord> = (0..n)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "id": format!("s{i}"),
                    "name": format!("Student {i:02}"),
                    "class_year": 2025 + (i % 3) as u16,
                    "major": if i % 2 == 0 { "Finance" } else { "History" },
                    "clubs": ["Chess Club"],
                }))
                .unwrap()
            })
            .collect();
        Roster::new(students).unwrap()
    }

    #[test]
    fn test_starts_on_first_page_with_configured_size() {
        let session = DirectorySession::new(&config());
        assert_eq!(session.page(), 1);
        assert_eq!(session.params().page_size, 2);
        assert!(!session.filters_open());
    }

    #[test]
    fn test_changes_reset_page() {
        let roster = roster(10);
        let mut session = DirectorySession::new(&config());
        session.query(&roster);

        session.go_to(3);
        session.set_name("student");
        assert_eq!(session.page(), 1);

        session.go_to(3);
        session.toggle(ScalarFilter::Major, "Finance");
        assert_eq!(session.page(), 1);

        session.go_to(3);
        session.toggle_class_year(2025);
        assert_eq!(session.page(), 1);

        session.go_to(3);
        session.set_terms(ListFilter::Club, ["chess"]);
        assert_eq!(session.page(), 1);

        session.go_to(3);
        session.set_sort(SortKey::LastZa);
        assert_eq!(session.page(), 1);

        session.go_to(3);
        session.set_page_size(4).unwrap();
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut session = DirectorySession::new(&config());
        session.toggle(ScalarFilter::Dorm, "Walsh Hall");
        assert!(session.params().dorms.contains("Walsh Hall"));
        session.toggle(ScalarFilter::Dorm, "Walsh Hall");
        assert!(session.params().dorms.is_empty());
    }

    #[test]
    fn test_navigation_clamps_to_last_result() {
        let roster = roster(5);
        let mut session = DirectorySession::new(&config());
        let outcome = session.query(&roster);
        assert_eq!(outcome.total_pages, 3);

        session.prev_page();
        assert_eq!(session.page(), 1);
        session.go_to(99);
        assert_eq!(session.page(), 3);
        session.next_page();
        assert_eq!(session.page(), 3);
        session.go_to(0);
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_navigation_before_any_query_stays_on_page_one() {
        let mut session = DirectorySession::new(&config());
        session.next_page();
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_unsupported_page_size_rejected() {
        let mut session = DirectorySession::new(&config());
        let err = session.set_page_size(3).unwrap_err();
        assert!(matches!(err, SessionError::UnsupportedPageSize { size: 3, .. }));
        assert_eq!(session.params().page_size, 2);
    }

    #[test]
    fn test_clear_all_keeps_page_size() {
        let mut session = DirectorySession::new(&config());
        session.set_page_size(4).unwrap();
        session.set_name("amy");
        session.toggle_class_year(2026);
        session.set_terms(ListFilter::Sport, ["rowing", "  "]);
        session.set_sort(SortKey::LastAz);
        assert_eq!(session.active_filter_count(), 2);
        assert_eq!(session.params().sports, vec!["rowing"]);

        session.clear_all();
        assert_eq!(session.active_filter_count(), 0);
        assert!(session.params().name.is_empty());
        assert_eq!(session.params().sort, SortKey::FirstAz);
        assert_eq!(session.params().page_size, 4);
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_query_excludes_viewer() {
        let roster = roster(3);
        let mut session = DirectorySession::new(&config()).with_viewer("s0");
        session.set_page_size(4).unwrap();
        let outcome = session.query(&roster);
        assert_eq!(outcome.total_matches, 2);
        assert!(outcome.items.iter().all(|s| s.id != "s0"));
    }

    #[test]
    fn test_toggle_filters_panel() {
        let mut session = DirectorySession::new(&config());
        session.toggle_filters();
        assert!(session.filters_open());
        session.toggle_filters();
        assert!(!session.filters_open());
    }
}
