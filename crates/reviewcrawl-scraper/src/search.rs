//! Search-result pagination: one keyword in, one listing request per page out.
//!
//! The first search page only tells us how many products match; the listing
//! pages are then requested explicitly with a fixed page size so every tile
//! is covered exactly once.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reviewcrawl_core::SearchQuery;
use scraper::{Html, Selector};

use crate::error::ScraperError;
use crate::extract::{first_integer, first_text, selector};
use crate::request::{CrawlRequest, Stage};

/// Products per listing page requested from the catalog.
pub const SEARCH_PAGE_SIZE: u64 = 36;

/// Characters escaped in the `q` parameter. `+` and `%` pass through so
/// keywords written pre-encoded (`Black+and+Decker`) reach the site unchanged.
const KEYWORD_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

static TOTAL_RESULTS: LazyLock<Selector> =
    LazyLock::new(|| selector("#main div.totalResults p"));

fn encode_keyword(keyword: &str) -> String {
    utf8_percent_encode(keyword, KEYWORD_ESCAPES).to_string()
}

fn search_base_url(site_url: &str, keyword: &str) -> String {
    format!(
        "{site_url}/search/products?q={}&sort=BoostOrder",
        encode_keyword(keyword)
    )
}

/// The request that starts a keyword's branch of the crawl.
#[must_use]
pub fn seed_request(site_url: &str, query: &SearchQuery) -> CrawlRequest {
    CrawlRequest::new(
        search_base_url(site_url, &query.keyword),
        Stage::Search {
            keyword: query.keyword.clone(),
        },
    )
}

/// Number of listing pages needed to cover `total` products.
#[must_use]
pub fn page_count(total: u64) -> u64 {
    total.div_ceil(SEARCH_PAGE_SIZE)
}

/// URL of the 1-based listing page `page` for `keyword`.
#[must_use]
pub fn listing_page_url(site_url: &str, keyword: &str, page: u64) -> String {
    format!(
        "{}&page={page}&pageSize={SEARCH_PAGE_SIZE}",
        search_base_url(site_url, keyword)
    )
}

/// Builds one listing request per result page for `keyword`.
///
/// Each request forwards the keyword as the brand label for every product
/// found on that page.
#[must_use]
pub fn listing_requests(site_url: &str, keyword: &str, total: u64) -> Vec<CrawlRequest> {
    (1..=page_count(total))
        .map(|page| {
            CrawlRequest::new(
                listing_page_url(site_url, keyword, page),
                Stage::Listing {
                    brand: keyword.to_owned(),
                },
            )
        })
        .collect()
}

/// Reads the total product count from the first search page.
///
/// # Errors
///
/// Returns [`ScraperError::MissingField`] when the count element is absent
/// or its text contains no digits.
pub fn parse_total_results(document: &Html, url: &str) -> Result<u64, ScraperError> {
    first_text(document, &TOTAL_RESULTS)
        .as_deref()
        .and_then(first_integer)
        .ok_or_else(|| ScraperError::MissingField {
            field: "total results",
            url: url.to_owned(),
        })
}

/// Handles the first search page for `keyword`, returning its listing requests.
///
/// # Errors
///
/// Returns [`ScraperError::MissingField`] when the result count cannot be read;
/// the keyword's branch ends there.
pub fn handle_search_page(
    site_url: &str,
    keyword: &str,
    url: &str,
    body: &str,
) -> Result<Vec<CrawlRequest>, ScraperError> {
    let document = Html::parse_document(body);
    let total = parse_total_results(&document, url)?;
    let requests = listing_requests(site_url, keyword, total);
    tracing::debug!(
        keyword,
        total,
        pages = requests.len(),
        "resolved search result pages"
    );
    Ok(requests)
}
