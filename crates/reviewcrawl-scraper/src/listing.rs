//! Product resolution from a page of search results.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::error::ScraperError;
use crate::extract::{first_attr_in, selector};
use crate::request::{CrawlRequest, Stage};

static PRODUCT_TILES: LazyLock<Selector> =
    LazyLock::new(|| selector("#main div.container-main article"));

static TILE_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[data-testid="productTileContainer"] > a"#));

/// Joins a site-relative product link onto the catalog origin.
///
/// Absolute `http(s)` links on the catalog's own host are kept as-is.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] for an absolute link with another
/// scheme (`javascript:`, `mailto:`), a link to another host, or a link that
/// does not parse.
pub fn product_url(site_url: &str, href: &str) -> Result<String, ScraperError> {
    let invalid = |reason: String| ScraperError::InvalidUrl {
        url: href.to_owned(),
        reason,
    };

    let base = reqwest::Url::parse(site_url).map_err(|e| invalid(e.to_string()))?;
    let resolved = base.join(href).map_err(|e| invalid(e.to_string()))?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", resolved.scheme())));
    }
    if resolved.host_str() != base.host_str() {
        return Err(invalid(format!(
            "host {} is outside the catalog",
            resolved.host_str().unwrap_or_default()
        )));
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        Ok(href.to_owned())
    } else if href.starts_with("//") {
        Ok(resolved.into())
    } else if href.starts_with('/') {
        Ok(format!("{site_url}{href}"))
    } else {
        Ok(format!("{site_url}/{href}"))
    }
}

/// Returns one detail request per product tile on a listing page.
///
/// Tiles are handled independently: a tile without a usable link is skipped
/// and the rest of the page is still resolved.
#[must_use]
pub fn handle_listing_page(site_url: &str, brand: &str, url: &str, body: &str) -> Vec<CrawlRequest> {
    let document = Html::parse_document(body);
    let mut requests = Vec::new();
    let mut skipped = 0usize;

    for (position, tile) in document.select(&PRODUCT_TILES).enumerate() {
        let Some(href) = first_attr_in(tile, &TILE_LINK, "href") else {
            skipped += 1;
            tracing::debug!(url, position, "product tile has no link; skipping");
            continue;
        };
        let product = match product_url(site_url, &href) {
            Ok(product) => product,
            Err(e) => {
                skipped += 1;
                tracing::warn!(url, position, error = %e, "product tile link unusable; skipping");
                continue;
            }
        };
        requests.push(CrawlRequest::new(
            product,
            Stage::Detail {
                brand: brand.to_owned(),
            },
        ));
    }

    tracing::debug!(
        url,
        brand,
        products = requests.len(),
        skipped,
        "resolved product tiles"
    );
    requests
}
