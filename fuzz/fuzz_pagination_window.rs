//! Fuzz target for the pagination window.
//!
//! Run with: cargo +nightly fuzz run fuzz_pagination_window
//!
//! Checks the structural guarantees of `pagination_window` for arbitrary
//! page counts: first and last page always shown, strictly increasing page
//! numbers, the current page present, never two ellipses in a row.

#![no_main]

use libfuzzer_sys::fuzz_target;
use studentdir_core::query::{PageItem, pagination_window};

fuzz_target!(|data: (u16, u16, u8)| {
    let (current, total, siblings) = data;
    let total = total as usize;
    let siblings = siblings as usize;
    let current = if total == 0 { 1 } else { current as usize % total + 1 };

    let window = pagination_window(current, total, siblings);
    if total == 0 {
        assert!(window.is_empty());
        return;
    }

    let pages: Vec<usize> = window
        .iter()
        .filter_map(|item| match item {
            PageItem::Page(n) => Some(*n),
            PageItem::Ellipsis => None,
        })
        .collect();
    assert_eq!(pages.first(), Some(&1));
    assert_eq!(pages.last(), Some(&total));
    assert!(pages.windows(2).all(|w| w[0] < w[1]));
    assert!(pages.contains(&current));
    assert!(
        window
            .windows(2)
            .all(|w| !(w[0] == PageItem::Ellipsis && w[1] == PageItem::Ellipsis))
    );
});
