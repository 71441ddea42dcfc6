//! Review pagination for one product.
//!
//! A product's reviews are fetched as a chain of pages in strict offset
//! order: the request for page N+1 is derived from the counters on page N
//! and only exists once page N has been handled. Each page is a separate
//! crawl request, so its records can be written out before the next page is
//! fetched while chains for different products run side by side.

mod page;

pub use page::{
    build_record, emit_records, handle_review_page, parse_review_page, IndexTruncation,
    PageOutcome, RawReview, ReviewPage,
};

use reviewcrawl_core::{ProductContext, ReviewRecord};

use crate::error::ScraperError;
use crate::pagination::next_page_url;
use crate::request::{CrawlRequest, Stage};

/// What one reviews page contributed to its product's chain.
#[derive(Debug)]
pub struct ReviewStep {
    /// Records of this page, in index order.
    pub records: Vec<ReviewRecord>,
    pub truncated: bool,
    /// Request for the following page, `None` once the reviews are exhausted.
    /// An error here ends the chain after `records` are written.
    pub next: Result<Option<CrawlRequest>, ScraperError>,
}

/// Handles one fetched reviews page for the product described by `context`.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedResponse`] when the page cannot be read;
/// the chain for this product ends there.
pub fn handle_reviews_response(
    url: &str,
    context: &ProductContext,
    site_tag: &str,
    body: &str,
) -> Result<ReviewStep, ScraperError> {
    let outcome = handle_review_page(url, body, context, site_tag)?;

    if let Some(truncation) = outcome.truncation {
        tracing::warn!(
            url,
            declared_limit = truncation.declared_limit,
            available = truncation.available,
            "reviews page shorter than its declared limit; emitted what was present"
        );
    }
    tracing::debug!(
        url,
        offset = outcome.cursor.offset,
        limit = outcome.cursor.limit,
        total = outcome.cursor.total,
        records = outcome.records.len(),
        "parsed reviews page"
    );

    let next = next_page_url(url, outcome.cursor).map(|next| {
        next.map(|next| {
            CrawlRequest::new(
                next,
                Stage::Reviews {
                    context: context.clone(),
                },
            )
        })
    });

    Ok(ReviewStep {
        records: outcome.records,
        truncated: outcome.truncation.is_some(),
        next,
    })
}
