use super::*;

#[test]
fn extract_site_origin_strips_path_and_query() {
    assert_eq!(
        extract_site_origin("https://www.bunnings.com.au/search/products?q=dewalt&sort=BoostOrder"),
        "https://www.bunnings.com.au"
    );
}

#[test]
fn extract_site_origin_bare_domain() {
    assert_eq!(
        extract_site_origin("https://www.bunnings.com.au"),
        "https://www.bunnings.com.au"
    );
}

#[test]
fn extract_site_origin_keeps_api_host() {
    assert_eq!(
        extract_site_origin("https://api.bazaarvoice.com/data/reviews.json?limit=6&offset=0"),
        "https://api.bazaarvoice.com"
    );
}

#[test]
fn extract_site_origin_fallback_for_unparseable_url() {
    assert_eq!(extract_site_origin("not a url/with/path"), "not a url/with");
}

#[test]
fn extract_domain_strips_scheme() {
    assert_eq!(
        extract_domain("https://www.bunnings.com.au"),
        "www.bunnings.com.au"
    );
    assert_eq!(
        extract_domain("http://api.bazaarvoice.com/data"),
        "api.bazaarvoice.com"
    );
}

#[test]
fn extract_domain_fallback_no_scheme() {
    assert_eq!(extract_domain("bunnings.com.au"), "bunnings.com.au");
}

#[test]
fn new_builds_with_zero_retries() {
    assert!(HttpFetcher::new(5, "reviewcrawl-test/0.1", 0, 0).is_ok());
}
