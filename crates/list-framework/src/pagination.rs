//! Stateless page arithmetic over a list length, plus the tiny amount of state
//! (current page, page size) a list screen keeps.
//!
//! Pages are 1-based.
//!
//! ```rust
//! use list_framework::pagination::{total_pages, Paginator};
//!
//! assert_eq!(total_pages(0, 10), 1);
//! assert_eq!(total_pages(21, 10), 3);
//!
//! let mut pager = Paginator::new(10);
//! pager.set_page(3);
//! let rows: Vec<u32> = (1..=21).collect();
//! assert_eq!(pager.slice(&rows), &[21]);
//! ```

use std::ops::Range;

/// `ceil(len / page_size)`, never less than one page.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Current page and page size of one list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Back to the first page. Called whenever the active criteria change.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Changing the page size invalidates the position, so it also resets to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Pulls the current page back into `[1, total_pages(len)]`.
    pub fn clamp(&mut self, len: usize) -> usize {
        self.page = self.page.clamp(1, total_pages(len, self.page_size));
        self.page
    }

    pub fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.page_size)
    }

    /// Index range of the current page, clamped to `len`.
    pub fn bounds(&self, len: usize) -> Range<usize> {
        let page = self.page.clamp(1, total_pages(len, self.page_size));
        let start = ((page - 1) * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.bounds(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_bounds_of_last_partial_page() {
        let mut pager = Paginator::new(4);
        pager.set_page(3);
        assert_eq!(pager.bounds(10), 8..10);
    }

    #[test]
    fn test_page_past_end_is_clamped_after_shrink() {
        let mut pager = Paginator::new(5);
        pager.set_page(3);
        assert_eq!(pager.bounds(15), 10..15);

        // Deletes shrank the list to one page.
        assert_eq!(pager.bounds(4), 0..4);
        assert_eq!(pager.clamp(4), 1);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_empty_list_has_empty_first_page() {
        let pager = Paginator::new(10);
        let rows: Vec<u8> = Vec::new();
        assert!(pager.slice(&rows).is_empty());
        assert_eq!(pager.total_pages(0), 1);
    }

    #[test]
    fn test_page_size_change_and_reset() {
        let mut pager = Paginator::new(10);
        pager.set_page(4);
        pager.set_page_size(25);
        assert_eq!(pager.page(), 1);

        pager.set_page(2);
        pager.reset();
        assert_eq!(pager.page(), 1);

        pager.set_page(0);
        assert_eq!(pager.page(), 1);
    }
}
