//! Fixed-size pagination over an ordered, fully-resolved sequence.
//!
//! Page numbers are 1-indexed. An out-of-range request clamps to the
//! nearest valid page instead of erroring, so `?page=9999` lands on the
//! last page and `?page=0` on the first.

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of results plus the metadata a client needs to render
/// pagination controls.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub total: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Slices an ordered sequence into fixed-size pages.
pub struct Paginator<T> {
    items: Vec<T>,
    per_page: usize,
}

impl<T: Clone> Paginator<T> {
    pub fn new(items: Vec<T>, per_page: usize) -> Self {
        Self {
            items,
            // A zero page size would make every page empty and the page
            // count undefined; treat it as the default.
            per_page: if per_page == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                per_page
            },
        }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Total page count; an empty sequence still has one (empty) page.
    pub fn num_pages(&self) -> usize {
        self.items.len().div_ceil(self.per_page).max(1)
    }

    /// Return the requested 1-indexed page, clamped into range.
    pub fn page(&self, number: usize) -> Page<T> {
        let num_pages = self.num_pages();
        let number = number.clamp(1, num_pages);

        let start = (number - 1) * self.per_page;
        let end = (start + self.per_page).min(self.items.len());
        let items = if start < self.items.len() {
            self.items[start..end].to_vec()
        } else {
            Vec::new()
        };

        Page {
            items,
            number,
            num_pages,
            total: self.items.len(),
            has_next: number < num_pages,
            has_previous: number > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginator(n: usize) -> Paginator<usize> {
        Paginator::new((0..n).collect(), 10)
    }

    #[test]
    fn thirteen_items_split_ten_and_three() {
        let p = paginator(13);
        assert_eq!(p.num_pages(), 2);

        let first = p.page(1);
        assert_eq!(first.items.len(), 10);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let second = p.page(2);
        assert_eq!(second.items.len(), 3);
        assert_eq!(second.items, vec![10, 11, 12]);
        assert!(!second.has_next);
        assert!(second.has_previous);
    }

    #[test]
    fn out_of_range_pages_clamp_instead_of_erroring() {
        let p = paginator(13);
        assert_eq!(p.page(0).number, 1);
        assert_eq!(p.page(999).number, 2);
        assert_eq!(p.page(999).items, vec![10, 11, 12]);
    }

    #[test]
    fn empty_sequence_has_a_single_empty_page() {
        let p = paginator(0);
        assert_eq!(p.num_pages(), 1);
        let page = p.page(1);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
        assert!(!page.has_previous);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn exact_multiple_does_not_grow_a_trailing_page() {
        let p = paginator(20);
        assert_eq!(p.num_pages(), 2);
        assert_eq!(p.page(2).items.len(), 10);
    }

    #[test]
    fn zero_page_size_falls_back_to_the_default() {
        let p = Paginator::new((0..25).collect::<Vec<_>>(), 0);
        assert_eq!(p.num_pages(), 3);
        assert_eq!(p.page(1).items.len(), DEFAULT_PAGE_SIZE);
    }
}
