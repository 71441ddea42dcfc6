use std::collections::BTreeMap;
use std::fmt;

use crate::error::ScraperError;
use crate::request::StageKind;

/// Counters for one crawl run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub keywords: usize,
    /// Keywords whose search page could not be fetched or read.
    pub keywords_failed: usize,
    pub search_pages: usize,
    pub listing_pages: usize,
    pub detail_pages: usize,
    /// Products whose review chain was started.
    pub products: usize,
    pub review_pages: usize,
    pub records: usize,
    pub truncated_pages: usize,
    pub duplicates_skipped: usize,
    /// Failures keyed by [`ScraperError::kind`].
    pub failures: BTreeMap<&'static str, usize>,
}

impl CrawlSummary {
    #[must_use]
    pub fn total_failures(&self) -> usize {
        self.failures.values().sum()
    }

    /// `true` when keywords were given and none of them got past search.
    #[must_use]
    pub fn all_keywords_failed(&self) -> bool {
        self.keywords > 0 && self.keywords_failed == self.keywords
    }

    pub(crate) fn page_done(&mut self, stage: StageKind) {
        match stage {
            StageKind::Search => self.search_pages += 1,
            StageKind::Listing => self.listing_pages += 1,
            StageKind::Detail => self.detail_pages += 1,
            StageKind::Reviews => self.review_pages += 1,
        }
    }

    pub(crate) fn failed(&mut self, stage: StageKind, error: &ScraperError) {
        *self.failures.entry(error.kind()).or_default() += 1;
        if stage == StageKind::Search {
            self.keywords_failed += 1;
        }
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records from {} products ({} review pages, {} truncated) across {} keywords; {} failures",
            self.records,
            self.products,
            self.review_pages,
            self.truncated_pages,
            self.keywords,
            self.total_failures()
        )
    }
}
