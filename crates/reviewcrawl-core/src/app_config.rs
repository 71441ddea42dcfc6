use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Fixed parameters of the third-party reviews endpoint.
///
/// Only the product identifier and the `limit`/`offset` pair vary between
/// requests; everything here is baked into every reviews URL.
#[derive(Clone, PartialEq, Eq)]
pub struct ReviewsApiConfig {
    /// Endpoint without a query string, e.g. `https://api.bazaarvoice.com/data/reviews.json`.
    pub endpoint: String,
    pub passkey: String,
    pub display_code: String,
    /// Catalog locale used in the `contentlocale` filters, e.g. `en_AU`.
    pub locale: String,
}

impl std::fmt::Debug for ReviewsApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewsApiConfig")
            .field("endpoint", &self.endpoint)
            .field("passkey", &"[redacted]")
            .field("display_code", &self.display_code)
            .field("locale", &self.locale)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub keywords_path: PathBuf,
    /// Catalog origin, e.g. `https://www.bunnings.com.au`.
    pub site_url: String,
    /// Constant written into `ReviewRecord::product_website`.
    pub site_tag: String,
    pub reviews_api: ReviewsApiConfig,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_requests: usize,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
