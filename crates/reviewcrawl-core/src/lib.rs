pub mod app_config;
pub mod config;
pub mod keywords;
pub mod reviews;

pub use app_config::{AppConfig, Environment, ReviewsApiConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use keywords::{load_keywords, KeywordConfig, KeywordsFile};
pub use reviews::{ProductContext, ReviewRecord, SearchQuery, ANONYMOUS, NOT_AVAILABLE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read keywords file {path}: {source}")]
    KeywordsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse keywords file: {0}")]
    KeywordsFileParse(#[source] serde_yaml::Error),

    #[error("keywords validation failed: {0}")]
    Validation(String),
}
