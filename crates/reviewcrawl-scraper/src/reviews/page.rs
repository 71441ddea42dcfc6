//! Parsing of a single reviews API page into output records.

use reviewcrawl_core::{ProductContext, ReviewRecord, NOT_AVAILABLE};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ScraperError;
use crate::extract::{json_text, json_text_or};
use crate::pagination::ReviewCursor;

/// Envelope of a reviews API response. Only the fields the crawler reads are
/// modelled; everything else (`Includes`, `Errors`, ...) is ignored.
#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    #[serde(rename = "Offset")]
    offset: Option<u64>,
    #[serde(rename = "Limit")]
    limit: Option<u64>,
    #[serde(rename = "TotalResults")]
    total_results: Option<u64>,
    #[serde(rename = "Results", default)]
    results: Option<Vec<Value>>,
}

/// One entry of the `Results` array. Every field is optional and defaulted
/// independently when the record is built.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawReview {
    #[serde(rename = "Id")]
    pub id: Option<Value>,
    #[serde(rename = "UserNickname")]
    pub user_nickname: Option<Value>,
    #[serde(rename = "Rating")]
    pub rating: Option<Value>,
    #[serde(rename = "SubmissionTime")]
    pub submission_time: Option<Value>,
    #[serde(rename = "ReviewText")]
    pub review_text: Option<Value>,
    #[serde(rename = "TotalPositiveFeedbackCount")]
    pub total_positive_feedback_count: Option<Value>,
    #[serde(rename = "TotalNegativeFeedbackCount")]
    pub total_negative_feedback_count: Option<Value>,
}

/// A reviews page with validated pagination counters.
///
/// Entries of `Results` are kept as raw JSON and read one at a time, so a
/// bad entry only affects the indexes from it onwards.
#[derive(Debug, Clone)]
pub struct ReviewPage {
    pub cursor: ReviewCursor,
    pub reviews: Vec<Value>,
}

/// Emission stopped before `Limit` records: the `Results` array ran out, or
/// the entry at index `available` was not a review object.
///
/// Records up to `available` were emitted; the page is treated as complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexTruncation {
    pub declared_limit: u64,
    pub available: usize,
}

/// Records built from one page plus the pagination state that follows it.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub cursor: ReviewCursor,
    pub records: Vec<ReviewRecord>,
    pub truncation: Option<IndexTruncation>,
}

/// Parses a reviews response body.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedResponse`] when the body is not JSON of
/// the expected shape, when `Offset`, `Limit` or `TotalResults` is missing,
/// or when `Limit` is zero.
pub fn parse_review_page(url: &str, body: &str) -> Result<ReviewPage, ScraperError> {
    let malformed = |reason: String| ScraperError::MalformedResponse {
        url: url.to_owned(),
        reason,
    };

    let response: ReviewsResponse =
        serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;

    let offset = response
        .offset
        .ok_or_else(|| malformed("missing Offset".to_string()))?;
    let limit = response
        .limit
        .ok_or_else(|| malformed("missing Limit".to_string()))?;
    let total = response
        .total_results
        .ok_or_else(|| malformed("missing TotalResults".to_string()))?;
    if limit == 0 {
        return Err(malformed("Limit is zero".to_string()));
    }

    Ok(ReviewPage {
        cursor: ReviewCursor {
            offset,
            limit,
            total,
        },
        reviews: response.results.unwrap_or_default(),
    })
}

/// Builds a [`ReviewRecord`] from one raw review and its product context.
#[must_use]
pub fn build_record(raw: &RawReview, context: &ProductContext, site_tag: &str) -> ReviewRecord {
    let mut record = ReviewRecord::empty(context, site_tag);
    if let Some(name) = json_text(raw.user_nickname.as_ref()).filter(|name| !name.is_empty()) {
        record.customer_name = name;
    }
    record.review_id = json_text_or(raw.id.as_ref(), NOT_AVAILABLE);
    record.customer_rating = json_text_or(raw.rating.as_ref(), NOT_AVAILABLE);
    record.customer_date = json_text_or(raw.submission_time.as_ref(), NOT_AVAILABLE);
    record.customer_review = json_text_or(raw.review_text.as_ref(), NOT_AVAILABLE);
    record.customer_support_count =
        json_text_or(raw.total_positive_feedback_count.as_ref(), NOT_AVAILABLE);
    record.customer_disagree_count =
        json_text_or(raw.total_negative_feedback_count.as_ref(), NOT_AVAILABLE);
    record
}

/// Reads the entry at `index`, or `None` when it is missing or not an object.
fn raw_review_at(reviews: &[Value], index: u64) -> Option<RawReview> {
    let entry = usize::try_from(index).ok().and_then(|i| reviews.get(i))?;
    if !entry.is_object() {
        return None;
    }
    RawReview::deserialize(entry).ok()
}

/// Emits one record per index in `0..Limit`.
///
/// Iteration is driven by the declared `Limit`, not by the length of
/// `Results`. An index past the end of the array, or an entry that is not a
/// review object, stops emission for this page; the records before it are
/// kept and the stop is reported as an [`IndexTruncation`].
#[must_use]
pub fn emit_records(
    page: &ReviewPage,
    context: &ProductContext,
    site_tag: &str,
) -> (Vec<ReviewRecord>, Option<IndexTruncation>) {
    let mut records = Vec::new();
    let mut truncation = None;
    for index in 0..page.cursor.limit {
        let Some(raw) = raw_review_at(&page.reviews, index) else {
            truncation = Some(IndexTruncation {
                declared_limit: page.cursor.limit,
                available: records.len(),
            });
            break;
        };
        records.push(build_record(&raw, context, site_tag));
    }
    (records, truncation)
}

/// Parses a reviews page and builds its records.
///
/// # Errors
///
/// Propagates [`parse_review_page`] failures; no records are produced for a
/// malformed page.
pub fn handle_review_page(
    url: &str,
    body: &str,
    context: &ProductContext,
    site_tag: &str,
) -> Result<PageOutcome, ScraperError> {
    let page = parse_review_page(url, body)?;
    let (records, truncation) = emit_records(&page, context, site_tag);
    Ok(PageOutcome {
        cursor: page.cursor,
        records,
        truncation,
    })
}
