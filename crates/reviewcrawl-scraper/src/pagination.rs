//! Offset/limit pagination for the reviews API.
//!
//! The API reports `Offset`, `Limit` and `TotalResults` on every page. The
//! next page is requested by rewriting the `limit=N&offset=M` pair in the
//! current URL and nothing else:
//!
//! ```text
//! ...&Stats=Reviews&limit=6&offset=0&sort=...   (first page)
//! ...&Stats=Reviews&limit=30&offset=6&sort=...  (second page)
//! ...&Stats=Reviews&limit=30&offset=36&sort=... (third page)
//! ```
//!
//! The first page asks for [`INITIAL_REVIEW_LIMIT`] reviews and every later
//! page for [`FOLLOW_UP_REVIEW_LIMIT`], regardless of what the previous page
//! returned.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScraperError;

/// Page size of the first reviews request for a product.
pub const INITIAL_REVIEW_LIMIT: u64 = 6;

/// Page size written into every follow-up reviews request.
pub const FOLLOW_UP_REVIEW_LIMIT: u64 = 30;

static LIMIT_OFFSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"limit=\d+&offset=\d+").expect("valid limit/offset regex"));

/// Pagination counters reported by one reviews page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewCursor {
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
}

impl ReviewCursor {
    /// Offset of the page after this one, or `None` once `offset + limit`
    /// reaches `total`.
    #[must_use]
    pub fn next_offset(&self) -> Option<u64> {
        let end = self.offset.saturating_add(self.limit);
        (end < self.total).then_some(end)
    }
}

/// Replaces every `limit=N&offset=M` pair in `url` with the given values.
///
/// # Errors
///
/// Returns [`ScraperError::UnpageableUrl`] when `url` has no such pair; the
/// rewritten URL would otherwise repeat the current page forever.
pub fn rewrite_limit_offset(url: &str, limit: u64, offset: u64) -> Result<String, ScraperError> {
    if !LIMIT_OFFSET.is_match(url) {
        return Err(ScraperError::UnpageableUrl {
            url: url.to_owned(),
        });
    }
    let replacement = format!("limit={limit}&offset={offset}");
    Ok(LIMIT_OFFSET
        .replace_all(url, regex::NoExpand(&replacement))
        .into_owned())
}

/// URL of the page after `cursor`, or `None` when the reviews are exhausted.
///
/// # Errors
///
/// Propagates [`rewrite_limit_offset`] failures.
pub fn next_page_url(url: &str, cursor: ReviewCursor) -> Result<Option<String>, ScraperError> {
    cursor
        .next_offset()
        .map(|offset| rewrite_limit_offset(url, FOLLOW_UP_REVIEW_LIMIT, offset))
        .transpose()
}
