use crate::app_config::{AppConfig, Environment, ReviewsApiConfig};
use crate::ConfigError;

/// Public passkey the catalog's own storefront sends to the reviews API.
const DEFAULT_REVIEWS_PASSKEY: &str = "caUZMUAJ5mm8n5r7EtVHRt5QhZFVEPcUKge0N3CDWAZFc";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a config
/// that crawls the Bunnings catalog with conservative transport settings.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("\"{raw}\" is not an http(s) URL"),
            });
        }
        Ok(trimmed.to_string())
    };

    let env = parse_environment(&or_default("REVIEWCRAWL_ENV", "development"))?;
    let log_level = or_default("REVIEWCRAWL_LOG_LEVEL", "info");
    let keywords_path = PathBuf::from(or_default(
        "REVIEWCRAWL_KEYWORDS_PATH",
        "./config/keywords.yaml",
    ));

    let site_url = parse_url("REVIEWCRAWL_SITE_URL", "https://www.bunnings.com.au")?;
    let site_tag = non_blank(
        "REVIEWCRAWL_SITE_TAG",
        or_default("REVIEWCRAWL_SITE_TAG", "bunnings"),
    )?;

    let reviews_api = ReviewsApiConfig {
        endpoint: parse_url(
            "REVIEWCRAWL_REVIEWS_API_URL",
            "https://api.bazaarvoice.com/data/reviews.json",
        )?,
        passkey: non_blank(
            "REVIEWCRAWL_REVIEWS_PASSKEY",
            or_default("REVIEWCRAWL_REVIEWS_PASSKEY", DEFAULT_REVIEWS_PASSKEY),
        )?,
        display_code: or_default("REVIEWCRAWL_REVIEWS_DISPLAY_CODE", "10414-en_au"),
        locale: or_default("REVIEWCRAWL_REVIEWS_LOCALE", "en_AU"),
    };

    let request_timeout_secs = parse_u64("REVIEWCRAWL_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "REVIEWCRAWL_USER_AGENT",
        "reviewcrawl/0.1 (review-research)",
    );
    let max_concurrent_requests = parse_usize("REVIEWCRAWL_MAX_CONCURRENT_REQUESTS", "8")?;
    if max_concurrent_requests == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "REVIEWCRAWL_MAX_CONCURRENT_REQUESTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let max_retries = parse_u32("REVIEWCRAWL_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("REVIEWCRAWL_RETRY_BACKOFF_BASE_SECS", "5")?;

    Ok(AppConfig {
        env,
        log_level,
        keywords_path,
        site_url,
        site_tag,
        reviews_api,
        request_timeout_secs,
        user_agent,
        max_concurrent_requests,
        max_retries,
        retry_backoff_base_secs,
    })
}

/// A variable set to an empty value counts as missing rather than falling
/// back to its default.
fn non_blank(var: &str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingEnvVar(var.to_string()));
    }
    Ok(value)
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REVIEWCRAWL_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
