use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "REVIEWCRAWL_ENV"));
}

#[test]
fn build_app_config_defaults_from_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.keywords_path.to_str(), Some("./config/keywords.yaml"));
    assert_eq!(cfg.site_url, "https://www.bunnings.com.au");
    assert_eq!(cfg.site_tag, "bunnings");
    assert_eq!(
        cfg.reviews_api.endpoint,
        "https://api.bazaarvoice.com/data/reviews.json"
    );
    assert_eq!(cfg.reviews_api.passkey, DEFAULT_REVIEWS_PASSKEY);
    assert_eq!(cfg.reviews_api.display_code, "10414-en_au");
    assert_eq!(cfg.reviews_api.locale, "en_AU");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "reviewcrawl/0.1 (review-research)");
    assert_eq!(cfg.max_concurrent_requests, 8);
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_secs, 5);
}

#[test]
fn site_url_trailing_slash_is_trimmed() {
    let mut map = HashMap::new();
    map.insert("REVIEWCRAWL_SITE_URL", "https://www.bunnings.co.nz/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.site_url, "https://www.bunnings.co.nz");
}

#[test]
fn site_url_without_scheme_is_rejected() {
    let mut map = HashMap::new();
    map.insert("REVIEWCRAWL_SITE_URL", "www.bunnings.com.au");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVIEWCRAWL_SITE_URL"),
        "expected InvalidEnvVar(REVIEWCRAWL_SITE_URL), got: {result:?}"
    );
}

#[test]
fn reviews_overrides_are_applied() {
    let mut map = HashMap::new();
    map.insert("REVIEWCRAWL_REVIEWS_PASSKEY", "secret");
    map.insert("REVIEWCRAWL_REVIEWS_DISPLAY_CODE", "10414-en_nz");
    map.insert("REVIEWCRAWL_REVIEWS_LOCALE", "en_NZ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.reviews_api.passkey, "secret");
    assert_eq!(cfg.reviews_api.display_code, "10414-en_nz");
    assert_eq!(cfg.reviews_api.locale, "en_NZ");
}

#[test]
fn passkey_is_redacted_in_debug_output() {
    let mut map = HashMap::new();
    map.insert("REVIEWCRAWL_REVIEWS_PASSKEY", "very-secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("very-secret-key"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn max_concurrent_requests_override() {
    let mut map = HashMap::new();
    map.insert("REVIEWCRAWL_MAX_CONCURRENT_REQUESTS", "16");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_concurrent_requests, 16);
}

#[test]
fn max_concurrent_requests_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("REVIEWCRAWL_MAX_CONCURRENT_REQUESTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVIEWCRAWL_MAX_CONCURRENT_REQUESTS"),
        "expected InvalidEnvVar(REVIEWCRAWL_MAX_CONCURRENT_REQUESTS), got: {result:?}"
    );
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = HashMap::new();
    map.insert("REVIEWCRAWL_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVIEWCRAWL_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(REVIEWCRAWL_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_override() {
    let mut map = HashMap::new();
    map.insert("REVIEWCRAWL_MAX_RETRIES", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 0);
}

#[test]
fn max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("REVIEWCRAWL_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVIEWCRAWL_MAX_RETRIES"),
        "expected InvalidEnvVar(REVIEWCRAWL_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn retry_backoff_base_secs_override() {
    let mut map = HashMap::new();
    map.insert("REVIEWCRAWL_RETRY_BACKOFF_BASE_SECS", "10");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.retry_backoff_base_secs, 10);
}

#[test]
fn blank_passkey_is_missing() {
    let map = HashMap::from([("REVIEWCRAWL_REVIEWS_PASSKEY", "  ")]);
    let err = build_app_config(lookup_from_map(&map)).unwrap_err();
    assert!(
        matches!(err, ConfigError::MissingEnvVar(ref var) if var == "REVIEWCRAWL_REVIEWS_PASSKEY"),
        "got {err:?}"
    );
}

#[test]
fn blank_site_tag_is_missing() {
    let map = HashMap::from([("REVIEWCRAWL_SITE_TAG", "")]);
    assert!(matches!(
        build_app_config(lookup_from_map(&map)),
        Err(ConfigError::MissingEnvVar(_))
    ));
}
