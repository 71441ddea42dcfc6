pub mod client;
pub mod crawl;
pub mod detail;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod listing;
pub mod pagination;
mod rate_limit;
pub mod request;
pub mod reviews;
pub mod search;
pub mod sink;

pub use client::HttpFetcher;
pub use crawl::{CrawlSummary, Crawler};
pub use error::ScraperError;
pub use fetch::Fetch;
pub use request::{CrawlRequest, Stage, StageKind};
pub use reviews::ReviewStep;
pub use sink::{JsonLinesSink, ReviewSink};
