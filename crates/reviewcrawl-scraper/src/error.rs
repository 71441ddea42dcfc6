use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("required field {field} missing from {url}")]
    MissingField { field: &'static str, url: String },

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("cannot paginate {url}: no limit/offset pair to rewrite")]
    UnpageableUrl { url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("review sink rejected record: {0}")]
    Sink(#[source] std::io::Error),
}

impl ScraperError {
    /// Short, stable label for the failure class, used in logs and summaries.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ScraperError::Http(_)
            | ScraperError::RateLimited { .. }
            | ScraperError::NotFound { .. }
            | ScraperError::UnexpectedStatus { .. } => "transport",
            ScraperError::MissingField { .. } => "missing_field",
            ScraperError::MalformedResponse { .. } => "malformed_response",
            ScraperError::UnpageableUrl { .. } | ScraperError::InvalidUrl { .. } => "request",
            ScraperError::Sink(_) => "sink",
        }
    }
}
