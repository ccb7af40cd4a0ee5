use serde::Serialize;

use crate::backend::pagination::Page;

/// Page size of the backend list endpoints.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    // Pages past the end are windowed around the last page.
    let current_page = current_page.min(last_page);
    let after_last = last_page.saturating_add(1);

    let mut pages = Vec::new();

    let left_end = left_edge.saturating_add(1).min(after_last);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current)
        .saturating_add(1)
        .min(after_last);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge).saturating_add(1));

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One page of items plus the page-number window shown under a table.
/// `None` entries in `pages` render as an ellipsis.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize, total: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            items,
            pages,
            page: current_page,
            total,
        }
    }

    /// Wraps a backend page, deriving the page count from the total.
    pub fn from_page(page: Page<T>, current_page: usize) -> Self {
        let total_pages = page.count.div_ceil(DEFAULT_ITEMS_PER_PAGE);
        Self::new(page.items, current_page, total_pages, page.count)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pages: self.pages,
            page: self.page,
            total: self.total,
        }
    }
}
