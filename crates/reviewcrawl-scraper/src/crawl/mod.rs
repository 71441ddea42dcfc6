//! Crawl orchestration.
//!
//! A single frontier of [`CrawlRequest`]s feeds a bounded set of in-flight
//! tasks. Every task performs one fetch. Search, listing and detail tasks
//! return follow-up requests; a reviews task returns one page of records and
//! the request for that product's next page. Records reach the sink as soon
//! as their page is handled, before the next page of the chain is queued.

mod frontier;
mod summary;

pub use summary::CrawlSummary;

use futures::stream::{FuturesUnordered, StreamExt};
use reviewcrawl_core::{AppConfig, ReviewsApiConfig, SearchQuery};

use crate::detail::handle_detail_page;
use crate::error::ScraperError;
use crate::fetch::Fetch;
use crate::listing::handle_listing_page;
use crate::request::{CrawlRequest, Stage, StageKind};
use crate::reviews::{handle_reviews_response, ReviewStep};
use crate::search::{handle_search_page, seed_request};
use crate::sink::ReviewSink;
use frontier::Frontier;

enum TaskOutcome {
    FollowUps(Vec<CrawlRequest>),
    Reviews(ReviewStep),
    Failed(ScraperError),
}

struct Completed {
    url: String,
    stage: StageKind,
    outcome: TaskOutcome,
}

/// Drives keywords through search, listing, detail and reviews.
pub struct Crawler<F> {
    fetcher: F,
    site_url: String,
    site_tag: String,
    reviews_api: ReviewsApiConfig,
    max_concurrent: usize,
}

impl<F: Fetch> Crawler<F> {
    /// Creates a crawler that runs one request at a time.
    #[must_use]
    pub fn new(
        fetcher: F,
        site_url: impl Into<String>,
        site_tag: impl Into<String>,
        reviews_api: ReviewsApiConfig,
    ) -> Self {
        Self {
            fetcher,
            site_url: site_url.into(),
            site_tag: site_tag.into(),
            reviews_api,
            max_concurrent: 1,
        }
    }

    #[must_use]
    pub fn from_config(fetcher: F, config: &AppConfig) -> Self {
        Self::new(
            fetcher,
            config.site_url.clone(),
            config.site_tag.clone(),
            config.reviews_api.clone(),
        )
        .with_max_concurrent(config.max_concurrent_requests)
    }

    /// Bounds the number of requests in flight. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// The first search request for each keyword.
    #[must_use]
    pub fn seed_requests(&self, queries: &[SearchQuery]) -> Vec<CrawlRequest> {
        queries
            .iter()
            .map(|query| seed_request(&self.site_url, query))
            .collect()
    }

    /// Crawls every keyword to exhaustion, passing records to `sink`.
    ///
    /// Failures of individual pages, products or keywords are logged and
    /// counted in the returned summary; the crawl continues with everything
    /// else.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Sink`] if the sink rejects a record. Requests
    /// still in flight are dropped.
    pub async fn run<S: ReviewSink>(
        &self,
        queries: &[SearchQuery],
        sink: &mut S,
    ) -> Result<CrawlSummary, ScraperError> {
        let mut summary = CrawlSummary::default();
        let mut frontier = Frontier::default();
        for request in self.seed_requests(queries) {
            if frontier.push(request) {
                summary.keywords += 1;
            } else {
                summary.duplicates_skipped += 1;
            }
        }

        let mut in_flight = FuturesUnordered::new();
        loop {
            while in_flight.len() < self.max_concurrent {
                let Some(request) = frontier.pop() else {
                    break;
                };
                in_flight.push(self.process(request));
            }

            let Some(done) = in_flight.next().await else {
                break;
            };
            absorb(done, &mut frontier, &mut summary, sink)?;
        }

        sink.finish()?;
        tracing::info!(
            keywords = summary.keywords,
            keywords_failed = summary.keywords_failed,
            search_pages = summary.search_pages,
            listing_pages = summary.listing_pages,
            detail_pages = summary.detail_pages,
            products = summary.products,
            review_pages = summary.review_pages,
            records = summary.records,
            truncated_pages = summary.truncated_pages,
            duplicates_skipped = summary.duplicates_skipped,
            failures = summary.total_failures(),
            "crawl complete"
        );
        Ok(summary)
    }

    async fn process(&self, request: CrawlRequest) -> Completed {
        let CrawlRequest { url, stage } = request;
        let kind = stage.kind();

        let outcome = match stage {
            Stage::Search { keyword } => {
                self.fetch_then(&url, |body| {
                    handle_search_page(&self.site_url, &keyword, &url, body)
                })
                .await
            }
            Stage::Listing { brand } => {
                self.fetch_then(&url, |body| {
                    Ok(handle_listing_page(&self.site_url, &brand, &url, body))
                })
                .await
            }
            Stage::Detail { brand } => {
                self.fetch_then(&url, |body| {
                    handle_detail_page(&self.reviews_api, &brand, &url, body).map(|r| vec![r])
                })
                .await
            }
            Stage::Reviews { context } => match self.fetcher.fetch(&url).await {
                Ok(body) => handle_reviews_response(&url, &context, &self.site_tag, &body)
                    .map_or_else(TaskOutcome::Failed, TaskOutcome::Reviews),
                Err(e) => TaskOutcome::Failed(e),
            },
        };

        Completed {
            url,
            stage: kind,
            outcome,
        }
    }

    async fn fetch_then<P>(&self, url: &str, parse: P) -> TaskOutcome
    where
        P: FnOnce(&str) -> Result<Vec<CrawlRequest>, ScraperError>,
    {
        match self.fetcher.fetch(url).await {
            Ok(body) => parse(&body).map_or_else(TaskOutcome::Failed, TaskOutcome::FollowUps),
            Err(e) => TaskOutcome::Failed(e),
        }
    }
}

fn absorb<S: ReviewSink>(
    done: Completed,
    frontier: &mut Frontier,
    summary: &mut CrawlSummary,
    sink: &mut S,
) -> Result<(), ScraperError> {
    let Completed {
        url,
        stage,
        outcome,
    } = done;

    match outcome {
        TaskOutcome::FollowUps(requests) => {
            summary.page_done(stage);
            for request in requests {
                let starts_chain = request.stage.kind() == StageKind::Reviews;
                if !frontier.push(request) {
                    summary.duplicates_skipped += 1;
                } else if starts_chain {
                    summary.products += 1;
                }
            }
        }
        TaskOutcome::Reviews(step) => {
            summary.page_done(stage);
            if step.truncated {
                summary.truncated_pages += 1;
            }
            for record in step.records {
                sink.accept(record)?;
                summary.records += 1;
            }
            match step.next {
                Ok(Some(next)) => {
                    if !frontier.push(next) {
                        summary.duplicates_skipped += 1;
                        tracing::warn!(url = %url, "reviews offset did not advance; ending chain");
                    }
                }
                Ok(None) => {}
                Err(error) => record_failure(summary, stage, &url, &error),
            }
        }
        TaskOutcome::Failed(error) => record_failure(summary, stage, &url, &error),
    }
    Ok(())
}

fn record_failure(summary: &mut CrawlSummary, stage: StageKind, url: &str, error: &ScraperError) {
    tracing::warn!(
        %stage,
        url,
        kind = error.kind(),
        error = %error,
        "request failed; continuing with remaining work"
    );
    summary.failed(stage, error);
}
