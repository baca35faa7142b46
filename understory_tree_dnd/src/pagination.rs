// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! List-mode pagination: a page window over a flat backing array.
//!
//! Only the current page is mirrored into the live tree. After a mutation the
//! page's records are written back over the same `[start, end)` range of the
//! backing array, and the window is taken again for the next render.

use alloc::vec::Vec;
use core::ops::Range;

/// A page window of `items_per_page` entries. Pages are numbered from 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pagination {
    /// Number of entries shown per page.
    pub items_per_page: usize,
    /// Current page, starting at 1. Page 0 is treated as page 1.
    pub page: usize,
}

impl Pagination {
    /// Create a window of `items_per_page` entries showing `page`.
    pub const fn new(items_per_page: usize, page: usize) -> Self {
        Self {
            items_per_page,
            page,
        }
    }

    /// Index of the first entry of the current page.
    pub const fn offset(&self) -> usize {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.items_per_page)
    }

    /// The index range of the current page within a backing array of `len`
    /// entries, clamped to `len`.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = self.offset().min(len);
        let end = start.saturating_add(self.items_per_page).min(len);
        start..end
    }

    /// Number of pages needed for `len` entries (at least 1).
    pub fn page_count(&self, len: usize) -> usize {
        if self.items_per_page == 0 {
            return 1;
        }
        len.div_ceil(self.items_per_page).max(1)
    }

    /// The entries of the current page.
    pub fn slice<'a, R>(&self, backing: &'a [R]) -> &'a [R] {
        &backing[self.range(backing.len())]
    }

    /// Replace the current page's range of `backing` with `page`.
    ///
    /// Entries outside the page range are left untouched. `page` may be shorter
    /// or longer than the range it replaces (after a removal or a drop from
    /// another tree); later entries shift accordingly.
    pub fn splice<R>(&self, backing: &mut Vec<R>, page: Vec<R>) {
        let range = self.range(backing.len());
        backing.splice(range, page);
    }
}

#[cfg(test)]
mod tests {
    use super::Pagination;
    use alloc::vec::Vec;

    #[test]
    fn second_page_covers_ten_to_twenty() {
        let p = Pagination::new(10, 2);
        assert_eq!(p.offset(), 10);
        assert_eq!(p.range(25), 10..20);
        assert_eq!(p.range(15), 10..15);
        assert_eq!(p.range(5), 5..5);
        assert_eq!(p.page_count(25), 3);
    }

    #[test]
    fn page_zero_is_first_page() {
        assert_eq!(Pagination::new(10, 0).range(25), 0..10);
    }

    #[test]
    fn splice_only_touches_page_range() {
        let mut backing: Vec<u32> = (0..25).collect();
        let p = Pagination::new(10, 2);
        let mut page = p.slice(&backing).to_vec();
        page.reverse();
        p.splice(&mut backing, page);
        assert_eq!(&backing[..10], &(0..10).collect::<Vec<_>>()[..]);
        assert_eq!(&backing[20..], &(20..25).collect::<Vec<_>>()[..]);
        assert_eq!(backing[10], 19);
        assert_eq!(backing[19], 10);
    }

    #[test]
    fn shorter_page_pulls_next_entry_in() {
        let mut backing: Vec<u32> = (0..25).collect();
        let p = Pagination::new(10, 1);
        let mut page = p.slice(&backing).to_vec();
        page.remove(0);
        p.splice(&mut backing, page);
        assert_eq!(backing.len(), 24);
        assert_eq!(p.slice(&backing), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }
}
