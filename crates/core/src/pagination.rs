//! Offset pagination for list pages.
//!
//! The list view has no total count, so the window always offers a next page
//! and an empty page past the end is a normal result.

use serde::Serialize;
use thiserror::Error;

/// Page used when the `page` parameter is absent.
pub const DEFAULT_PAGE: i64 = 1;
/// Limit used when the `limit` parameter is absent.
pub const DEFAULT_LIMIT: i64 = 10;
/// Larger limits are clamped to this value.
pub const MAX_LIMIT: i64 = 100;

/// Rejected pagination parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// `page` is not an integer or is below 1.
    #[error("invalid page")]
    InvalidPage,
    /// `limit` is not an integer or is below 1.
    #[error("invalid limit")]
    InvalidLimit,
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Resolve raw `page`/`limit` query values.
    ///
    /// `None` and empty strings fall back to the defaults. A `limit` above
    /// [`MAX_LIMIT`] is clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] or
    /// [`PaginationError::InvalidLimit`] for non-integer or sub-1 values.
    /// `page` is checked first.
    pub fn resolve(
        raw_page: Option<&str>,
        raw_limit: Option<&str>,
    ) -> Result<Self, PaginationError> {
        let page = match non_empty(raw_page) {
            Some(raw) => parse_positive(raw).ok_or(PaginationError::InvalidPage)?,
            None => DEFAULT_PAGE,
        };

        let limit = match non_empty(raw_limit) {
            Some(raw) => parse_positive(raw)
                .ok_or(PaginationError::InvalidLimit)?
                .min(MAX_LIMIT),
            None => DEFAULT_LIMIT,
        };

        Ok(Self { page, limit })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// Rows per page, in `1..=MAX_LIMIT`.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Rows to skip: `(page - 1) * limit`.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Navigation values for the list view.
    #[must_use]
    pub const fn window(&self) -> PageWindow {
        PageWindow {
            page: self.page,
            limit: self.limit,
            offset: self.offset(),
            prev_page: if self.page > 1 { self.page - 1 } else { 0 },
            next_page: self.page.saturating_add(1),
        }
    }
}

/// Derived navigation tuple. `prev_page == 0` means there is no previous page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
    pub prev_page: i64,
    pub next_page: i64,
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

fn parse_positive(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|n| *n >= 1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::resolve(None, None).unwrap();
        assert_eq!(req, PageRequest::default());
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let req = PageRequest::resolve(Some(""), Some("")).unwrap();
        assert_eq!(req, PageRequest::default());
    }

    #[test]
    fn test_offset() {
        let req = PageRequest::resolve(Some("3"), Some("25")).unwrap();
        assert_eq!(req.offset(), 50);

        let req = PageRequest::resolve(Some("1"), Some("1")).unwrap();
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        let req = PageRequest::resolve(None, Some("101")).unwrap();
        assert_eq!(req.limit(), 100);

        let req = PageRequest::resolve(Some("2"), Some("5000")).unwrap();
        assert_eq!(req.limit(), 100);
        assert_eq!(req.offset(), 100);
    }

    #[test]
    fn test_limit_at_max_is_kept() {
        let req = PageRequest::resolve(None, Some("100")).unwrap();
        assert_eq!(req.limit(), 100);
    }

    #[test]
    fn test_invalid_page() {
        for raw in ["0", "-1", "abc", "1.0", " 2"] {
            assert_eq!(
                PageRequest::resolve(Some(raw), None),
                Err(PaginationError::InvalidPage),
                "expected page {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_limit() {
        for raw in ["0", "-5", "ten"] {
            assert_eq!(
                PageRequest::resolve(None, Some(raw)),
                Err(PaginationError::InvalidLimit),
                "expected limit {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_page_checked_before_limit() {
        assert_eq!(
            PageRequest::resolve(Some("0"), Some("0")),
            Err(PaginationError::InvalidPage)
        );
    }

    #[test]
    fn test_no_upper_bound_on_page() {
        let req = PageRequest::resolve(Some("1000000"), Some("10")).unwrap();
        assert_eq!(req.offset(), 9_999_990);

        let req = PageRequest::resolve(Some(&i64::MAX.to_string()), Some("100")).unwrap();
        assert_eq!(req.offset(), i64::MAX);
        assert_eq!(req.window().next_page, i64::MAX);
    }

    #[test]
    fn test_window_first_page() {
        let window = PageRequest::default().window();
        assert_eq!(
            window,
            PageWindow {
                page: 1,
                limit: 10,
                offset: 0,
                prev_page: 0,
                next_page: 2,
            }
        );
    }

    #[test]
    fn test_window_later_page() {
        let window = PageRequest::resolve(Some("4"), Some("20")).unwrap().window();
        assert_eq!(window.prev_page, 3);
        assert_eq!(window.next_page, 5);
        assert_eq!(window.offset, 60);
    }

    #[test]
    fn test_messages() {
        assert_eq!(PaginationError::InvalidPage.to_string(), "invalid page");
        assert_eq!(PaginationError::InvalidLimit.to_string(), "invalid limit");
    }
}
