//! HTTP headers for the fund data upstreams

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0.0.0 Safari/537.36";

const FUND_SITE_REFERER: &str = "http://fund.eastmoney.com/";

/// Headers for the fund valuation endpoint.
///
/// The endpoint rejects requests without a referer from the fund site.
pub fn valuation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(REFERER, HeaderValue::from_static(FUND_SITE_REFERER));
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers
}

/// Headers for the holdings disclosure pages
pub fn disclosure_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("text/html, */*"));
    headers.insert(REFERER, HeaderValue::from_static(FUND_SITE_REFERER));
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers
}

/// Headers for the batch quote service
pub fn quote_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers
}
