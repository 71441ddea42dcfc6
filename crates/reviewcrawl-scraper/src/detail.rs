//! Product detail extraction and construction of the first reviews request.

use std::sync::LazyLock;

use reviewcrawl_core::{ProductContext, ReviewsApiConfig};
use scraper::{Html, Selector};

use crate::error::ScraperError;
use crate::extract::{element_text, first_digit_run, first_text, selector};
use crate::pagination::INITIAL_REVIEW_LIMIT;
use crate::request::{CrawlRequest, Stage};

/// Specification row label whose value becomes the product model.
pub const MODEL_NUMBER_LABEL: &str = "Model Number";

static ITEM_NUMBER: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"#main div.desktopProductDetails p[data-locator="product-item-number"]"#)
});

static PRODUCT_TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector("#main div.desktopProductDetails h1"));

static SPEC_ROWS: LazyLock<Selector> = LazyLock::new(|| selector("#main table tr"));

static SPEC_CELLS: LazyLock<Selector> = LazyLock::new(|| selector("th, td"));

/// Identity of one product as read from its detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    /// Digits of the catalog item number, leading zeros kept.
    pub product_id: String,
    pub name: Option<String>,
    pub model: Option<String>,
}

/// Reads the model number from the product details table.
///
/// Returns the value of the last row labelled exactly [`MODEL_NUMBER_LABEL`],
/// or `None` when no such row exists or its value is blank.
#[must_use]
pub fn parse_model_number(document: &Html) -> Option<String> {
    let mut model = None;
    for row in document.select(&SPEC_ROWS) {
        let mut cells = row.select(&SPEC_CELLS).map(element_text);
        let (Some(label), Some(value)) = (cells.next(), cells.next()) else {
            continue;
        };
        if label == MODEL_NUMBER_LABEL {
            model = Some(value);
        }
    }
    model.filter(|value| !value.is_empty())
}

/// Extracts the product identifier, title and model from a detail page.
///
/// # Errors
///
/// Returns [`ScraperError::MissingField`] when the page has no item number
/// or the item number contains no digits.
pub fn parse_product_detail(document: &Html, url: &str) -> Result<ProductDetail, ScraperError> {
    let product_id = first_text(document, &ITEM_NUMBER)
        .as_deref()
        .and_then(first_digit_run)
        .map(str::to_owned)
        .ok_or_else(|| ScraperError::MissingField {
            field: "item number",
            url: url.to_owned(),
        })?;

    Ok(ProductDetail {
        product_id,
        name: first_text(document, &PRODUCT_TITLE),
        model: parse_model_number(document),
    })
}

/// First-page reviews URL for `product_id`.
///
/// Filter values are pre-escaped (`%3A` for `:`, `%2C` for `,`) because the
/// reviews API rejects any other spelling of its filter syntax. Only the
/// product id, locale and credentials vary; the `limit=6&offset=0` pair is
/// rewritten later for follow-up pages.
#[must_use]
pub fn reviews_api_url(api: &ReviewsApiConfig, product_id: &str) -> String {
    let locale = &api.locale;
    format!(
        "{endpoint}?resource=reviews&action=REVIEWS_N_STATS\
         &filter=productid%3Aeq%3A{product_id}\
         &filter=contentlocale%3Aeq%3Aen*%2C{locale}%2C{locale}\
         &filter=isratingsonly%3Aeq%3Afalse\
         &filter_reviews=contentlocale%3Aeq%3Aen*%2C{locale}%2C{locale}\
         &include=authors%2Cproducts&filteredstats=reviews&Stats=Reviews\
         &limit={INITIAL_REVIEW_LIMIT}&offset=0\
         &sort=helpfulness%3Adesc%2Ctotalpositivefeedbackcount%3Adesc\
         &passkey={passkey}&apiversion=5.5&displaycode={display_code}",
        endpoint = api.endpoint,
        passkey = api.passkey,
        display_code = api.display_code,
    )
}

/// Handles a product detail page, returning the product's first reviews request.
///
/// # Errors
///
/// Returns [`ScraperError::MissingField`] when the item number is missing; the
/// product's chain ends there without affecting other products.
pub fn handle_detail_page(
    api: &ReviewsApiConfig,
    brand: &str,
    url: &str,
    body: &str,
) -> Result<CrawlRequest, ScraperError> {
    let document = Html::parse_document(body);
    let detail = parse_product_detail(&document, url)?;
    tracing::debug!(
        url,
        product_id = %detail.product_id,
        model = detail.model.as_deref().unwrap_or("-"),
        "resolved product detail"
    );

    let context = ProductContext::new(brand, detail.name, detail.model);
    Ok(CrawlRequest::new(
        reviews_api_url(api, &detail.product_id),
        Stage::Reviews { context },
    ))
}
