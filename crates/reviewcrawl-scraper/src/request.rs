//! Units of crawl work and the context each one carries.

use reviewcrawl_core::ProductContext;

/// Which handler processes a request's response, together with the context
/// forwarded from the stage that produced the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// First search page for a keyword; yields the result count.
    Search { keyword: String },
    /// One page of search results listing product tiles.
    Listing { brand: String },
    /// A product detail page.
    Detail { brand: String },
    /// One page of a product's reviews; the next page is queued once it is handled.
    Reviews { context: ProductContext },
}

impl Stage {
    #[must_use]
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Search { .. } => StageKind::Search,
            Stage::Listing { .. } => StageKind::Listing,
            Stage::Detail { .. } => StageKind::Detail,
            Stage::Reviews { .. } => StageKind::Reviews,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Search,
    Listing,
    Detail,
    Reviews,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageKind::Search => write!(f, "search"),
            StageKind::Listing => write!(f, "listing"),
            StageKind::Detail => write!(f, "detail"),
            StageKind::Reviews => write!(f, "reviews"),
        }
    }
}

/// A GET request the crawler still has to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub url: String,
    pub stage: Stage,
}

impl CrawlRequest {
    #[must_use]
    pub fn new(url: impl Into<String>, stage: Stage) -> Self {
        Self {
            url: url.into(),
            stage,
        }
    }
}
