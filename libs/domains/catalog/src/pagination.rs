//! Window arithmetic for the gender-blended product listing.
//!
//! A page is served primary-gender first; whatever space remains on the page
//! is backfilled from the secondary gender. The split is pure arithmetic over
//! the primary segment's total count, so it is computed (and tested) without
//! touching the database.

/// A skip/limit pair describing one slice of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: i64,
}

impl Window {
    pub fn new(skip: u64, limit: i64) -> Self {
        Self { skip, limit }
    }

    /// True when this window selects nothing
    pub fn is_empty(&self) -> bool {
        self.limit <= 0
    }
}

/// Split one page into a primary-gender window and a secondary backfill
/// window.
///
/// `total_primary` is the number of matching documents in the primary
/// segment, `skip` is `(page - 1) * limit`. The primary window is clamped to
/// what the segment can still serve; the secondary window covers the rest of
/// the page, skipping the secondary rows already served on earlier pages.
pub fn split_page(total_primary: u64, skip: u64, limit: i64) -> (Window, Window) {
    let remaining_primary = total_primary.saturating_sub(skip);
    let primary_limit = (limit as u64).min(remaining_primary) as i64;

    let primary = Window::new(skip, primary_limit);
    let secondary = Window::new(skip.saturating_sub(total_primary), limit - primary_limit);

    (primary, secondary)
}

/// Total pages for a listing: `ceil(total / limit)`
pub fn total_pages(total_products: u64, limit: i64) -> u64 {
    let limit = limit.max(1) as u64;
    total_products.div_ceil(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_blends_when_primary_runs_short() {
        // 7 primary products, page 1, limit 10: 7 primary then 3 backfill
        let (primary, secondary) = split_page(7, 0, 10);
        assert_eq!(primary, Window::new(0, 7));
        assert_eq!(secondary, Window::new(0, 3));
    }

    #[test]
    fn test_second_page_is_all_secondary() {
        // Page 2 of the same listing: primary exhausted, secondary already
        // contributed 3 rows on page 1
        let (primary, secondary) = split_page(7, 10, 10);
        assert!(primary.is_empty());
        assert_eq!(secondary, Window::new(3, 10));
    }

    #[test]
    fn test_full_primary_page_needs_no_backfill() {
        let (primary, secondary) = split_page(25, 10, 10);
        assert_eq!(primary, Window::new(10, 10));
        assert!(secondary.is_empty());
        assert_eq!(secondary.skip, 0);
    }

    #[test]
    fn test_boundary_page_splits_exactly() {
        // 15 primary, page 2 of 10: 5 primary left, 5 backfill
        let (primary, secondary) = split_page(15, 10, 10);
        assert_eq!(primary, Window::new(10, 5));
        assert_eq!(secondary, Window::new(0, 5));
    }

    #[test]
    fn test_empty_primary_segment() {
        let (primary, secondary) = split_page(0, 0, 10);
        assert!(primary.is_empty());
        assert_eq!(secondary, Window::new(0, 10));
    }

    #[test]
    fn test_skip_exactly_at_primary_total() {
        let (primary, secondary) = split_page(10, 10, 10);
        assert!(primary.is_empty());
        assert_eq!(secondary, Window::new(0, 10));
    }

    #[test]
    fn test_windows_always_cover_the_page() {
        for total_primary in 0..30u64 {
            for page in 1..5u64 {
                let limit = 10i64;
                let skip = (page - 1) * limit as u64;
                let (primary, secondary) = split_page(total_primary, skip, limit);
                assert_eq!(primary.limit + secondary.limit, limit);
                assert!(primary.limit >= 0);
                assert!(secondary.limit >= 0);
            }
        }
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 10), 1);
    }
}
