//! Windowed pagination shared by every list view.
//!
//! At most [`MAX_VISIBLE_PAGES`] page numbers are shown around the current
//! page; longer runs of hidden pages collapse into an ellipsis marker that
//! links to the first page hidden behind it.

/// Width of the visible page window.
pub const MAX_VISIBLE_PAGES: u64 = 7;

/// Rows shown on one page of any list.
pub const PAGE_SIZE: u64 = 10;

/// One entry of the rendered page window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageMarker {
    /// A page that can be jumped to directly
    Page(u64),
    /// Gap between the first page and the window
    EllipsisBefore,
    /// Gap between the window and the last page
    EllipsisAfter,
}

/// Number of pages needed for `item_count` rows.
#[must_use]
pub const fn total_pages(item_count: u64) -> u64 {
    item_count.div_ceil(PAGE_SIZE)
}

/// Index range of the rows on `page` (1-indexed) out of `item_count` rows.
#[must_use]
pub fn page_range(page: u64, item_count: u64) -> std::ops::Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE).min(item_count);
    let end = start.saturating_add(PAGE_SIZE).min(item_count);
    usize::try_from(start).unwrap_or(usize::MAX)..usize::try_from(end).unwrap_or(usize::MAX)
}

/// Resolves the requested page against the number of available pages.
///
/// A missing request means page 1 and out-of-range numbers are clamped.
/// Returns `None` when the request is not a number at all.
#[must_use]
pub fn current_page(requested: Option<&str>, total_pages: u64) -> Option<u64> {
    let Some(raw) = requested else {
        return Some(1);
    };
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if negative {
        return Some(clamp_page(0, total_pages));
    }
    // Too large for u64 still means "past the last page"
    let page = digits.parse::<u64>().unwrap_or(u64::MAX);
    Some(clamp_page(page, total_pages))
}

/// Clamps `page` into `[1, total_pages]`; an empty list still has page 1.
#[must_use]
pub fn clamp_page(page: u64, total_pages: u64) -> u64 {
    page.clamp(1, total_pages.max(1))
}

/// Computes the page window for `current_page` out of `total_pages`.
#[must_use]
pub fn page_window(current_page: u64, total_pages: u64) -> Vec<PageMarker> {
    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).map(PageMarker::Page).collect();
    }

    let current = clamp_page(current_page, total_pages);
    let half = MAX_VISIBLE_PAGES / 2;
    let pages_left = current - 1;
    let pages_right = total_pages - current;
    let mut window = Vec::with_capacity(usize::try_from(MAX_VISIBLE_PAGES + 2).unwrap_or(0));

    if pages_left <= half {
        // The slack left of the current page is added to the right block
        let difference = half - pages_left;
        let max_page_right = current + half + difference - 1;
        window.extend((1..=max_page_right).map(PageMarker::Page));
        window.push(PageMarker::EllipsisAfter);
        window.push(PageMarker::Page(total_pages));
    } else if pages_right <= half {
        let difference = half - pages_right;
        let min_page_left = current - half - difference + 1;
        window.push(PageMarker::Page(1));
        window.push(PageMarker::EllipsisBefore);
        window.extend((min_page_left..=total_pages).map(PageMarker::Page));
    } else {
        let min_page_left = current - half + 1;
        let max_page_right = current + half - 1;
        window.push(PageMarker::Page(1));
        window.push(PageMarker::EllipsisBefore);
        window.extend((min_page_left..=max_page_right).map(PageMarker::Page));
        window.push(PageMarker::EllipsisAfter);
        window.push(PageMarker::Page(total_pages));
    }

    window
}

/// Pagination state of one rendered list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination {
    current: u64,
    total: u64,
    window: Vec<PageMarker>,
}

impl Pagination {
    /// Builds the pagination for `current_page`, clamped into range.
    #[must_use]
    pub fn new(current_page: u64, total_pages: u64) -> Self {
        let current = clamp_page(current_page, total_pages);
        Self {
            current,
            total: total_pages,
            window: page_window(current, total_pages),
        }
    }

    /// The clamped current page.
    #[must_use]
    pub const fn current(&self) -> u64 {
        self.current
    }

    /// Total number of pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The page window to render.
    #[must_use]
    pub fn pages(&self) -> &[PageMarker] {
        &self.window
    }

    /// The page after the current one, never past the last page.
    #[must_use]
    pub fn next_page(&self) -> u64 {
        (self.current + 1).min(self.total).max(1)
    }

    /// The page before the current one, never before page 1.
    #[must_use]
    pub fn prev_page(&self) -> u64 {
        self.current.saturating_sub(1).max(1)
    }

    /// The page a marker links to.
    ///
    /// An ellipsis links to the first hidden page next to the visible block.
    /// Returns `None` for a marker that is not part of this window.
    #[must_use]
    pub fn resolve(&self, marker: PageMarker) -> Option<u64> {
        let position = self.window.iter().position(|m| *m == marker)?;
        match marker {
            PageMarker::Page(page) => Some(page),
            PageMarker::EllipsisAfter => match self.window.get(position.checked_sub(1)?)? {
                PageMarker::Page(page) => Some(page + 1),
                _ => None,
            },
            PageMarker::EllipsisBefore => match self.window.get(position + 1)? {
                PageMarker::Page(page) => Some(page - 1),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use super::PageMarker::{EllipsisAfter, EllipsisBefore, Page};

    fn pages(numbers: impl IntoIterator<Item = u64>) -> Vec<PageMarker> {
        numbers.into_iter().map(Page).collect()
    }

    #[test]
    fn test_short_lists_show_every_page() {
        for total in 0..=MAX_VISIBLE_PAGES {
            for current in 1..=total.max(1) {
                assert_eq!(page_window(current, total), pages(1..=total));
            }
        }
    }

    #[test]
    fn test_first_page_of_twenty() {
        let pagination = Pagination::new(1, 20);
        let mut expected = pages(1..=6);
        expected.extend([EllipsisAfter, Page(20)]);
        assert_eq!(pagination.pages(), expected.as_slice());
        assert_eq!(pagination.next_page(), 2);
        assert_eq!(pagination.prev_page(), 1);
        assert_eq!(pagination.resolve(EllipsisAfter), Some(7));
    }

    #[test]
    fn test_last_page_of_twenty() {
        let pagination = Pagination::new(20, 20);
        let mut expected = vec![Page(1), EllipsisBefore];
        expected.extend(pages(15..=20));
        assert_eq!(pagination.pages(), expected.as_slice());
        assert_eq!(pagination.next_page(), 20);
        assert_eq!(pagination.prev_page(), 19);
        assert_eq!(pagination.resolve(EllipsisBefore), Some(14));
    }

    #[test]
    fn test_middle_page_of_twenty() {
        let pagination = Pagination::new(10, 20);
        let mut expected = vec![Page(1), EllipsisBefore];
        expected.extend(pages(8..=12));
        expected.extend([EllipsisAfter, Page(20)]);
        assert_eq!(pagination.pages(), expected.as_slice());
        assert_eq!(pagination.resolve(EllipsisBefore), Some(7));
        assert_eq!(pagination.resolve(EllipsisAfter), Some(13));
        assert_eq!(pagination.resolve(Page(9)), Some(9));
        assert_eq!(pagination.resolve(Page(2)), None);
    }

    #[test]
    fn test_window_boundaries_near_edges() {
        // Still within reach of the first page
        let mut expected = pages(1..=6);
        expected.extend([EllipsisAfter, Page(20)]);
        assert_eq!(page_window(4, 20), expected);

        // First page that leaves the left block
        let mut expected = vec![Page(1), EllipsisBefore];
        expected.extend(pages(3..=7));
        expected.extend([EllipsisAfter, Page(20)]);
        assert_eq!(page_window(5, 20), expected);

        // Within reach of the last page
        let mut expected = vec![Page(1), EllipsisBefore];
        expected.extend(pages(15..=20));
        assert_eq!(page_window(17, 20), expected);
    }

    #[test]
    fn test_eight_pages_hide_a_single_page() {
        let pagination = Pagination::new(1, 8);
        let mut expected = pages(1..=6);
        expected.extend([EllipsisAfter, Page(8)]);
        assert_eq!(pagination.pages(), expected.as_slice());
        assert_eq!(pagination.resolve(EllipsisAfter), Some(7));

        let pagination = Pagination::new(8, 8);
        let mut expected = vec![Page(1), EllipsisBefore];
        expected.extend(pages(3..=8));
        assert_eq!(pagination.pages(), expected.as_slice());
        assert_eq!(pagination.resolve(EllipsisBefore), Some(2));
    }

    #[test]
    fn test_current_page_parsing() {
        assert_eq!(current_page(None, 5), Some(1));
        assert_eq!(current_page(Some("3"), 5), Some(3));
        assert_eq!(current_page(Some("0"), 5), Some(1));
        assert_eq!(current_page(Some("-4"), 5), Some(1));
        assert_eq!(current_page(Some("99"), 5), Some(5));
        assert_eq!(current_page(Some("two"), 5), None);
        assert_eq!(current_page(Some("1"), 0), Some(1));
        assert_eq!(current_page(Some("99999999999999999999"), 5), Some(5));
        assert_eq!(current_page(Some("-99999999999999999999"), 5), Some(1));
        assert_eq!(current_page(Some("+2"), 5), Some(2));
        assert_eq!(current_page(Some("-"), 5), None);
        assert_eq!(current_page(Some("1.5"), 5), None);
    }

    #[test]
    fn test_empty_list_pagination() {
        let pagination = Pagination::new(3, 0);
        assert_eq!(pagination.current(), 1);
        assert!(pagination.pages().is_empty());
        assert_eq!(pagination.next_page(), 1);
        assert_eq!(pagination.prev_page(), 1);
    }

    #[test]
    fn test_page_slicing() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(page_range(1, 25), 0..10);
        assert_eq!(page_range(3, 25), 20..25);
        assert_eq!(page_range(4, 25), 25..25);
    }
}
