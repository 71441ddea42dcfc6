//! Field extraction primitives shared by every crawl stage.
//!
//! HTML fields are addressed with CSS selectors over a parsed
//! [`scraper::Html`] tree; JSON fields are addressed by key over a
//! [`serde_json::Value`]. Every helper returns `None` for an absent or empty
//! field so callers decide whether absence is fatal or defaulted.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid digit-run regex"));

/// Compiles a selector literal. Only called with constants from the stage
/// modules, so a parse failure is a programming error.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

/// Returns the first run of ASCII digits in `text`.
///
/// `"Product #: 0123456"` → `Some("0123456")`.
#[must_use]
pub fn first_digit_run(text: &str) -> Option<&str> {
    DIGIT_RUN.find(text).map(|m| m.as_str())
}

/// Parses the first run of digits in `text` as an integer.
///
/// Returns `None` when there are no digits or the run overflows `u64`.
#[must_use]
pub fn first_integer(text: &str) -> Option<u64> {
    first_digit_run(text).and_then(|digits| digits.parse().ok())
}

/// Text content of an element with runs of whitespace collapsed to one space.
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first element matching `selector`, if it has any.
#[must_use]
pub fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Attribute `attr` of the first element under `scope` matching `selector`.
#[must_use]
pub fn first_attr_in(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Renders a JSON scalar as record text.
///
/// Strings are returned verbatim, numbers and booleans use their JSON
/// spelling, and `null` counts as absent. Arrays and objects are rendered
/// as compact JSON.
#[must_use]
pub fn json_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// [`json_text`] with a fallback for absent values.
#[must_use]
pub fn json_text_or(value: Option<&Value>, default: &str) -> String {
    json_text(value).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_digit_run_skips_leading_text() {
        assert_eq!(first_digit_run("I/N: 0345678"), Some("0345678"));
    }

    #[test]
    fn first_digit_run_takes_only_first_run() {
        assert_eq!(first_digit_run("1,234 results of 99"), Some("1"));
    }

    #[test]
    fn first_integer_none_without_digits() {
        assert_eq!(first_integer("no results"), None);
    }

    #[test]
    fn first_integer_parses_embedded_count() {
        assert_eq!(first_integer("We found 412 results"), Some(412));
    }

    #[test]
    fn first_integer_rejects_overflow() {
        assert_eq!(first_integer("99999999999999999999999"), None);
    }

    #[test]
    fn first_text_collapses_whitespace() {
        let doc = Html::parse_document("<div><h1>\n  DeWalt   18V\n Drill </h1></div>");
        assert_eq!(
            first_text(&doc, &selector("h1")).as_deref(),
            Some("DeWalt 18V Drill")
        );
    }

    #[test]
    fn first_text_treats_empty_element_as_absent() {
        let doc = Html::parse_document("<p class=\"x\">   </p>");
        assert!(first_text(&doc, &selector("p.x")).is_none());
    }

    #[test]
    fn first_attr_in_reads_scoped_attribute() {
        let doc = Html::parse_document(
            "<article><div><a href=\"/p/1\">one</a></div></article><a href=\"/other\">x</a>",
        );
        let article = doc.select(&selector("article")).next().unwrap();
        assert_eq!(
            first_attr_in(article, &selector("div > a"), "href").as_deref(),
            Some("/p/1")
        );
    }

    #[test]
    fn json_text_renders_scalars() {
        let v = json!({"s": "text", "n": 5, "f": 4.5, "b": true, "z": null});
        assert_eq!(json_text(v.get("s")).as_deref(), Some("text"));
        assert_eq!(json_text(v.get("n")).as_deref(), Some("5"));
        assert_eq!(json_text(v.get("f")).as_deref(), Some("4.5"));
        assert_eq!(json_text(v.get("b")).as_deref(), Some("true"));
        assert!(json_text(v.get("z")).is_none());
        assert!(json_text(v.get("missing")).is_none());
    }

    #[test]
    fn json_text_or_defaults_missing() {
        let v = json!({});
        assert_eq!(json_text_or(v.get("Rating"), "N/A"), "N/A");
    }

    #[test]
    fn json_text_or_keeps_empty_string() {
        let v = json!({"ReviewText": ""});
        assert_eq!(json_text_or(v.get("ReviewText"), "N/A"), "");
    }
}
