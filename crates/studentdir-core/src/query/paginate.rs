//! Page slicing.

/// One page of an ordered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
}

/// `ceil(count / page_size)`; zero for an empty result or a zero page size.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Slice out the 1-based `page` of `items`.
///
/// Page 0, a page past the end, and a zero page size all yield an empty
/// slice rather than panicking; clamping is the caller's concern.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let total_pages = total_pages(items.len(), page_size);
    if page == 0 || page_size == 0 {
        return Page {
            items: &items[..0],
            total_pages,
        };
    }

    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    Page {
        items: &items[start..end],
        total_pages,
    }
}
