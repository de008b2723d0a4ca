//! Compact pagination controls: `1 … 4 5 6 … 12`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One entry of the pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageItem {
    /// A clickable 1-based page number.
    Page(usize),
    /// A non-interactive gap marker.
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{n}"),
            PageItem::Ellipsis => f.write_str("…"),
        }
    }
}

/// Build the page buttons for `current_page` out of `total_pages`.
///
/// Up to `sibling_count + 5` pages are listed in full. Beyond that the first
/// and last pages are always shown, with the current page and its siblings
/// in between and an ellipsis standing in for each skipped run. When only one
/// side is skipped, the other side shows a run of `3 + 2 * sibling_count`
/// pages.
///
/// Edge runs never repeat the first or last page, and a window with nothing
/// to skip on either side lists every page.
pub fn pagination_window(
    current_page: usize,
    total_pages: usize,
    sibling_count: usize,
) -> Vec<PageItem> {
    let budget = sibling_count.saturating_add(5);
    if budget >= total_pages {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let left_sibling = current_page.saturating_sub(sibling_count).max(1);
    let right_sibling = current_page.saturating_add(sibling_count).min(total_pages);

    // total_pages > budget >= 5, so the subtraction cannot underflow.
    let show_left_dots = left_sibling > 2;
    let show_right_dots = right_sibling < total_pages - 2;

    let edge_run = sibling_count.saturating_mul(2).saturating_add(3);

    let mut items = Vec::with_capacity(edge_run + 4);
    match (show_left_dots, show_right_dots) {
        (false, true) => {
            let last_left = edge_run.min(total_pages - 1);
            items.extend((1..=last_left).map(PageItem::Page));
            items.push(PageItem::Ellipsis);
            items.push(PageItem::Page(total_pages));
        }
        (true, false) => {
            let first_right = (total_pages + 1).saturating_sub(edge_run).max(2);
            items.push(PageItem::Page(1));
            items.push(PageItem::Ellipsis);
            items.extend((first_right..=total_pages).map(PageItem::Page));
        }
        (true, true) => {
            items.push(PageItem::Page(1));
            items.push(PageItem::Ellipsis);
            items.extend((left_sibling..=right_sibling).map(PageItem::Page));
            items.push(PageItem::Ellipsis);
            items.push(PageItem::Page(total_pages));
        }
        (false, false) => {
            items.extend((1..=total_pages).map(PageItem::Page));
        }
    }
    items
}
