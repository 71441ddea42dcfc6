//! The transport seam between the crawl pipeline and the network.

use std::future::Future;

use crate::error::ScraperError;

/// Performs a GET and returns the response body as text.
///
/// Implementations own retries, timeouts and status handling; by the time an
/// error reaches the pipeline it is terminal for that one request.
/// [`crate::client::HttpFetcher`] is the production implementation; tests
/// substitute canned pages.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

impl<T: Fetch + Sync + ?Sized> Fetch for &T {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send {
        (**self).fetch(url)
    }
}
