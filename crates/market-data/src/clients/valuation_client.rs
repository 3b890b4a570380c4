//! Fund valuation client (JSONP endpoint)

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::FundValuation;
use crate::provider::ValuationSource;
use crate::utils::headers::valuation_headers;

const VALUATION_BASE_URL: &str = "http://fundgz.1234567.com.cn/js";
const SOURCE_NAME: &str = "fund-valuation";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

lazy_static! {
    /// `callbackName(<payload>);` with optional surrounding whitespace
    static ref JSONP_WRAPPER: Regex =
        Regex::new(r"(?s)^\s*[A-Za-z_$][\w$]*\((.*)\)\s*;?\s*$")
            .expect("Invalid regex pattern");
}

/// Raw valuation object as embedded in the JSONP body.
///
/// Numeric fields arrive as strings in production and as numbers in some mirrors.
#[derive(Debug, Deserialize)]
struct ValuationPayload {
    #[serde(default)]
    fundcode: Option<String>,
    name: String,
    gsz: Value,
    dwjz: Value,
    gszzl: Value,
    #[serde(default)]
    gztime: Option<String>,
}

/// Client for the vendor's per-fund valuation script.
#[derive(Clone)]
pub struct FundValuationClient {
    client: Client,
    base_url: String,
}

impl FundValuationClient {
    /// Create a client against the production endpoint
    pub fn new(timeout: Duration) -> Result<Self, MarketDataError> {
        Self::with_base_url(VALUATION_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .default_headers(valuation_headers())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, code: &str) -> String {
        format!("{}/{}.js", self.base_url, code)
    }
}

#[async_trait]
impl ValuationSource for FundValuationClient {
    async fn fetch_valuation(&self, code: &str) -> Result<FundValuation, MarketDataError> {
        let url = self.url_for(code);
        debug!("Fetching valuation for {} from {}", code, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketDataError::from_request(SOURCE_NAME, e))?;

        if !response.status().is_success() {
            return Err(MarketDataError::HttpStatus {
                source_name: SOURCE_NAME.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| MarketDataError::from_request(SOURCE_NAME, e))?;

        parse_valuation_body(code, &body)
    }
}

/// Parse a `callback({...});` body into a [`FundValuation`].
pub fn parse_valuation_body(code: &str, body: &str) -> Result<FundValuation, MarketDataError> {
    let json = JSONP_WRAPPER
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            MarketDataError::Parse(format!("valuation body for {} is not a JSONP call", code))
        })?;

    let payload: ValuationPayload = serde_json::from_str(json)
        .map_err(|e| MarketDataError::Parse(format!("valuation JSON for {}: {}", code, e)))?;

    let as_of = payload
        .gztime
        .as_deref()
        .and_then(|t| NaiveDateTime::parse_from_str(t.trim(), TIMESTAMP_FORMAT).ok());

    Ok(FundValuation {
        code: payload.fundcode.unwrap_or_else(|| code.to_string()),
        name: payload.name,
        estimated_nav: decimal_field("gsz", &payload.gsz)?,
        previous_nav: decimal_field("dwjz", &payload.dwjz)?,
        change_pct: decimal_field("gszzl", &payload.gszzl)?,
        as_of,
    })
}

fn decimal_field(field: &str, value: &Value) -> Result<Decimal, MarketDataError> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(MarketDataError::Parse(format!(
                "field {} has unexpected value {}",
                field, other
            )))
        }
    };
    Decimal::from_str(&text)
        .map_err(|e| MarketDataError::Parse(format!("field {} = {:?}: {}", field, text, e)))
}
