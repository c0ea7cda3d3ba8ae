use std::ops::Range;

/// Window of one page over `total` ordered items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub range: Range<usize>,
    pub total_pages: usize,
}

/// `page` is 1-based and `limit` at least 1; callers clamp before calling.
/// Pages past the end yield an empty range. There is always at least one page.
pub fn page_window(total: usize, page: usize, limit: usize) -> PageWindow {
    let limit = limit.max(1);
    let total_pages = total.div_ceil(limit).max(1);
    let start = page.max(1).saturating_sub(1).saturating_mul(limit).min(total);
    let end = start.saturating_add(limit).min(total);
    PageWindow { range: start..end, total_pages }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_is_partial() {
        let w = page_window(10, 4, 3);
        assert_eq!(w.total_pages, 4);
        assert_eq!(w.range, 9..10);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let w = page_window(0, 1, 10);
        assert_eq!(w.total_pages, 1);
        assert!(w.range.is_empty());
    }

    #[test]
    fn page_past_end_is_empty() {
        assert!(page_window(5, 3, 5).range.is_empty());
    }
}
