//! Batch quote client (change percentage for stocks and indices)

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{Market, SecurityId};
use crate::provider::ChangeQuoteSource;
use crate::utils::headers::quote_headers;

const QUOTE_BASE_URL: &str = "https://push2.eastmoney.com/api/qt/ulist.np/get";
const SOURCE_NAME: &str = "batch-quote";
/// f3 = change %, f12 = code, f13 = market, f14 = name
const QUOTE_FIELDS: &str = "f3,f12,f13,f14";

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    data: Option<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    diff: Vec<QuoteRow>,
}

#[derive(Debug, Deserialize)]
struct QuoteRow {
    #[serde(rename = "f3")]
    change_pct: Value,
    #[serde(rename = "f12")]
    code: String,
    #[serde(rename = "f13")]
    market: i64,
}

/// Client for the multi-security snapshot endpoint.
#[derive(Clone)]
pub struct BatchQuoteClient {
    client: Client,
    base_url: String,
}

impl BatchQuoteClient {
    pub fn new(timeout: Duration) -> Result<Self, MarketDataError> {
        Self::with_base_url(QUOTE_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .default_headers(quote_headers())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl ChangeQuoteSource for BatchQuoteClient {
    async fn fetch_change_pcts(
        &self,
        ids: &[SecurityId],
    ) -> Result<HashMap<SecurityId, Decimal>, MarketDataError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let secids = ids
            .iter()
            .map(SecurityId::secid)
            .collect::<Vec<_>>()
            .join(",");
        debug!("Fetching change quotes for {}", secids);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("fltt", "2"),
                ("invt", "2"),
                ("fields", QUOTE_FIELDS),
                ("secids", secids.as_str()),
            ])
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

        parse_quote_response(&body)
    }
}

/// Parse the snapshot JSON into change percentages keyed by security.
///
/// A `null` data block means none of the requested ids were recognised and yields an
/// empty map. Rows whose change is not numeric (suspended securities report `"-"`) are dropped.
pub fn parse_quote_response(body: &str) -> Result<HashMap<SecurityId, Decimal>, MarketDataError> {
    let response: QuoteResponse = serde_json::from_str(body)
        .map_err(|e| MarketDataError::Parse(format!("quote response: {}", e)))?;

    let rows = response.data.map(|d| d.diff).unwrap_or_default();
    let mut quotes = HashMap::with_capacity(rows.len());
    for row in rows {
        let Some(market) = Market::from_prefix(row.market) else {
            continue;
        };
        let change = match &row.change_pct {
            Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
            Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        };
        if let Some(change) = change {
            quotes.insert(SecurityId::new(market, row.code), change);
        }
    }

    Ok(quotes)
}
