use serde::{Deserialize, Serialize};

/// Placeholder written for any review or product field the source omits.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for reviews submitted without a nickname.
pub const ANONYMOUS: &str = "Anonymous";

/// A configured search keyword that seeds one crawl branch.
///
/// The keyword doubles as the brand label carried on every record that
/// branch produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
}

impl SearchQuery {
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
        }
    }
}

/// Per-product labels resolved on the detail page and forwarded, by value,
/// through every reviews request for that product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductContext {
    pub brand: String,
    /// Display title from the detail page. `None` when the page had no title;
    /// the `"N/A"` default is applied only when records are built.
    pub name: Option<String>,
    /// Manufacturer model number, `"N/A"` when the product details table has none.
    pub model: String,
}

impl ProductContext {
    #[must_use]
    pub fn new(brand: impl Into<String>, name: Option<String>, model: Option<String>) -> Self {
        Self {
            brand: brand.into(),
            name,
            model: model
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }

    /// Product name as written into output records.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// One customer review, normalized and labelled with its product context.
///
/// Every field is a string: values the reviews API omits are replaced with
/// [`NOT_AVAILABLE`] (or [`ANONYMOUS`] for the reviewer name) and numeric
/// values keep their JSON rendering, e.g. `"5"` for a rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub review_id: String,
    /// Constant tag naming the catalog site, e.g. `"bunnings"`.
    pub product_website: String,
    /// Always `"N/A"`; the catalog does not expose a product type.
    pub product_type: String,
    pub product_name: String,
    pub product_brand: String,
    pub product_model: String,
    pub customer_name: String,
    pub customer_rating: String,
    /// Submission timestamp exactly as the API returns it.
    pub customer_date: String,
    pub customer_review: String,
    /// Helpful votes (`TotalPositiveFeedbackCount`).
    pub customer_support_count: String,
    /// Unhelpful votes (`TotalNegativeFeedbackCount`).
    pub customer_disagree_count: String,
}

impl ReviewRecord {
    /// A record for `context` with every review field at its placeholder.
    ///
    /// The reviewer name starts as [`ANONYMOUS`]; all other review fields
    /// start as [`NOT_AVAILABLE`].
    #[must_use]
    pub fn empty(context: &ProductContext, site_tag: &str) -> Self {
        Self {
            review_id: NOT_AVAILABLE.to_string(),
            product_website: site_tag.to_owned(),
            product_type: NOT_AVAILABLE.to_string(),
            product_name: context.display_name().to_owned(),
            product_brand: context.brand.clone(),
            product_model: context.model.clone(),
            customer_name: ANONYMOUS.to_string(),
            customer_rating: NOT_AVAILABLE.to_string(),
            customer_date: NOT_AVAILABLE.to_string(),
            customer_review: NOT_AVAILABLE.to_string(),
            customer_support_count: NOT_AVAILABLE.to_string(),
            customer_disagree_count: NOT_AVAILABLE.to_string(),
        }
    }
}
