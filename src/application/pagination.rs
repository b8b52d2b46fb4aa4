//! Skip/limit pagination helpers.
//!
//! Raw `page`/`limit` query values are normalised here once; everything
//! downstream (cache keys, primary-store queries, continuation flags) works
//! from the resulting [`PageRequest`].

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// A validated page window. Both fields are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Build a window, substituting defaults for zero values.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: if page < 1 { DEFAULT_PAGE } else { page },
            limit: if limit < 1 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Normalise raw query-string values.
    ///
    /// Absent, unparsable and non-positive values all fall back to the
    /// defaults. `limit` has no upper bound.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn flags(&self, total: u64) -> PageFlags {
        derive_flags(total, self.skip(), self.limit, self.page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    let value: i64 = raw?.trim().parse().ok()?;
    u64::try_from(value).ok().filter(|value| *value >= 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFlags {
    pub has_next: bool,
    pub has_prev: bool,
}

pub fn derive_flags(total: u64, skip: u64, limit: u64, page: u64) -> PageFlags {
    PageFlags {
        has_next: skip.saturating_add(limit) < total,
        has_prev: page > 1,
    }
}

/// One page of owner-scoped records plus continuation metadata.
///
/// This is exactly what gets written to the cache; the provenance tag is
/// attached separately at response time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PageResult<T> {
    pub fn assemble(request: PageRequest, total: u64, items: Vec<T>) -> Self {
        let flags = request.flags(total);
        Self {
            items,
            page: request.page(),
            limit: request.limit(),
            total,
            has_next: flags.has_next,
            has_prev: flags.has_prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_page_of_twenty_five() {
        let request = PageRequest::new(2, 10);
        assert_eq!(request.skip(), 10);

        let flags = request.flags(25);
        assert!(flags.has_next);
        assert!(flags.has_prev);
    }

    #[test]
    fn last_page_of_twenty_five_has_no_next() {
        let request = PageRequest::new(3, 10);
        assert_eq!(request.skip(), 20);

        let flags = request.flags(25);
        assert!(!flags.has_next);
        assert!(flags.has_prev);
    }

    #[test]
    fn exact_boundary_has_no_next() {
        let flags = PageRequest::new(2, 10).flags(20);
        assert!(!flags.has_next);
    }

    #[test]
    fn first_page_has_no_prev() {
        let flags = PageRequest::new(1, 10).flags(25);
        assert!(flags.has_next);
        assert!(!flags.has_prev);
    }

    #[test]
    fn raw_values_fall_back_to_defaults() {
        let cases = [
            (None, None),
            (Some("0"), Some("0")),
            (Some("-4"), Some("-1")),
            (Some("abc"), Some("ten")),
            (Some(""), Some(" ")),
            (Some("99999999999999999999999"), None),
        ];

        for (page, limit) in cases {
            let request = PageRequest::from_raw(page, limit);
            assert_eq!(request.page(), DEFAULT_PAGE, "page for {page:?}");
            assert_eq!(request.limit(), DEFAULT_LIMIT, "limit for {limit:?}");
        }
    }

    #[test]
    fn raw_values_are_kept_when_positive() {
        let request = PageRequest::from_raw(Some("3"), Some("250"));
        assert_eq!(request.page(), 3);
        assert_eq!(request.limit(), 250);
        assert_eq!(request.skip(), 500);
    }

    #[test]
    fn huge_windows_saturate_instead_of_overflowing() {
        let request = PageRequest::new(u64::MAX, u64::MAX);
        assert_eq!(request.skip(), u64::MAX);
        assert!(!request.flags(u64::MAX).has_next);
    }

    #[test]
    fn assembled_page_serializes_camel_case_flags() {
        let page = PageResult::assemble(PageRequest::new(2, 1), 3, vec!["b"]);
        let json = serde_json::to_value(&page).expect("serialize page");

        assert_eq!(json["items"], serde_json::json!(["b"]));
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], true);
        assert_eq!(json["total"], 3);
        assert!(json.get("source").is_none());
    }
}
