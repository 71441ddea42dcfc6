//! URL origin and domain extraction utilities for the HTTP client.

/// Extracts the scheme+host origin from a URL.
///
/// Given `"https://www.bunnings.com.au/search/products?q=dewalt"`, returns
/// `"https://www.bunnings.com.au"`. Used as the `Referer` for outbound requests.
#[must_use]
pub fn extract_site_origin(url: &str) -> String {
    reqwest::Url::parse(url).map_or_else(
        |e| {
            tracing::warn!(
                url,
                error = %e,
                "could not parse URL; falling back to string split for origin extraction"
            );
            url.trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
pub(super) fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
