//! Holdings disclosure client (quarterly top-10 holdings table)

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};

use crate::errors::MarketDataError;
use crate::models::{is_hong_kong_code, DisclosedHolding};
use crate::provider::HoldingsDisclosureSource;
use crate::utils::headers::disclosure_headers;

const DISCLOSURE_BASE_URL: &str = "http://fundf10.eastmoney.com/FundArchivesDatas.aspx";
const SOURCE_NAME: &str = "holdings-disclosure";

const CODE_HEADER: &str = "股票代码";
const NAME_HEADER: &str = "股票名称";
/// Weight column headers seen across page revisions
const WEIGHT_HEADERS: &[&str] = &["占净值比例", "持仓占比"];

/// Client for the fund archive page that publishes top stock holdings.
#[derive(Clone)]
pub struct HoldingsDisclosureClient {
    client: Client,
    base_url: String,
}

impl HoldingsDisclosureClient {
    pub fn new(timeout: Duration) -> Result<Self, MarketDataError> {
        Self::with_base_url(DISCLOSURE_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .default_headers(disclosure_headers())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl HoldingsDisclosureSource for HoldingsDisclosureClient {
    async fn fetch_top_holdings(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<DisclosedHolding>, MarketDataError> {
        let topline = limit.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("type", "jjcc"), ("code", code), ("topline", topline.as_str())])
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

        parse_holdings_table(code, &body, limit)
    }
}

/// Extract holdings rows from the first table in a disclosure page.
///
/// The page lists one table per reporting quarter, newest first; only the newest is used.
/// Columns are located by header text so reordered or added columns do not matter.
/// Rows with an unparsable weight are skipped.
pub fn parse_holdings_table(
    code: &str,
    body: &str,
    limit: usize,
) -> Result<Vec<DisclosedHolding>, MarketDataError> {
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("th, td")?;

    let document = Html::parse_document(body);
    let table = document.select(&table_selector).next().ok_or_else(|| {
        MarketDataError::DataUnavailable(format!("no holdings table for {}", code))
    })?;

    let mut rows = table.select(&row_selector);
    let header: Vec<String> = rows
        .next()
        .map(|row| row.select(&cell_selector).map(cell_text).collect())
        .unwrap_or_default();

    let code_col = column_index(&header, &[CODE_HEADER]);
    let name_col = column_index(&header, &[NAME_HEADER]);
    let weight_col = column_index(&header, WEIGHT_HEADERS);
    let (code_col, name_col, weight_col) = match (code_col, name_col, weight_col) {
        (Some(c), Some(n), Some(w)) => (c, n, w),
        _ => {
            return Err(MarketDataError::Parse(format!(
                "holdings table for {} has unexpected header {:?}",
                code, header
            )))
        }
    };

    let mut holdings = Vec::new();
    for row in rows {
        let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();
        let (Some(stock_code), Some(name), Some(weight)) =
            (cells.get(code_col), cells.get(name_col), cells.get(weight_col))
        else {
            continue;
        };

        let Some(weight_pct) = parse_weight(weight) else {
            debug!(
                "Skipping holding {} of fund {}: weight {:?} is not numeric",
                stock_code, code, weight
            );
            continue;
        };

        holdings.push(DisclosedHolding {
            stock_code: normalize_stock_code(stock_code),
            name: name.clone(),
            weight_pct,
        });

        if holdings.len() == limit {
            break;
        }
    }

    if holdings.is_empty() {
        return Err(MarketDataError::DataUnavailable(format!(
            "holdings table for {} is empty",
            code
        )));
    }

    Ok(holdings)
}

/// Restores leading zeros of A-share codes. Hong Kong codes keep their five digits.
fn normalize_stock_code(raw: &str) -> String {
    let raw = raw.trim();
    if is_hong_kong_code(raw) {
        raw.to_string()
    } else {
        format!("{:0>6}", raw)
    }
}

fn selector(css: &str) -> Result<Selector, MarketDataError> {
    Selector::parse(css).map_err(|e| MarketDataError::Parse(format!("selector {}: {:?}", css, e)))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().flat_map(|t| t.chars()).filter(|c| !c.is_whitespace()).collect()
}

fn column_index(header: &[String], candidates: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| candidates.iter().any(|c| h.contains(c)))
}

fn parse_weight(text: &str) -> Option<Decimal> {
    Decimal::from_str(text.trim_end_matches('%')).ok()
}
