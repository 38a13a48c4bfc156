//! # Pager
//!
//! Splits a flat list of items into pages addressable by single digit keys.
//! Pure arithmetic, no menu knowledge.
//!
//! ```text
//! 12 items, page length 10
//!
//!   page 0: [0 .. 10)   keys '0'..'9'
//!   page 1: [10 .. 12)  keys '0'..'1'
//! ```

use std::ops::Range;

/// Maximum number of items on one page (keys '0' through '9').
pub const PAGE_LENGTH: usize = 10;
pub const FIRST_PAGE: usize = 0;

/// Number of pages needed for `item_count` items. Always at least one.
pub fn total_pages(item_count: usize, page_length: usize) -> usize {
    if page_length == 0 {
        return 1;
    }
    item_count.div_ceil(page_length).max(1)
}

/// Item indices shown on `page`, clamped to `item_count`.
///
/// A page past the end yields an empty range rather than panicking.
pub fn page_range(item_count: usize, page: usize, page_length: usize) -> Range<usize> {
    let start = page.saturating_mul(page_length).min(item_count);
    let end = start.saturating_add(page_length).min(item_count);
    start..end
}

pub fn can_page_forward(page: usize, total_pages: usize) -> bool {
    page + 1 < total_pages
}

pub fn can_page_backward(page: usize) -> bool {
    page > FIRST_PAGE
}

/// Pulls `page` back into `[0, total_pages - 1]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages.saturating_sub(1))
}
