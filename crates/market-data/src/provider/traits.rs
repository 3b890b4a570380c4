//! Upstream source trait definitions.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{DisclosedHolding, FundValuation, SecurityId};

/// Vendor valuation for a single fund.
#[async_trait]
pub trait ValuationSource: Send + Sync {
    /// Fetch the vendor's current valuation for `code`.
    ///
    /// # Errors
    ///
    /// `Network`/`Timeout`/`HttpStatus` when the request fails, `Parse` when the payload
    /// does not match the expected wrapper or JSON shape.
    async fn fetch_valuation(&self, code: &str) -> Result<FundValuation, MarketDataError>;
}

/// Published top holdings of a fund.
#[async_trait]
pub trait HoldingsDisclosureSource: Send + Sync {
    /// Fetch up to `limit` disclosed holdings for `code`, in published order.
    ///
    /// Returns `DataUnavailable` when the fund has no disclosed stock holdings.
    async fn fetch_top_holdings(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<DisclosedHolding>, MarketDataError>;
}

/// Current change percentage for a batch of stocks and indices.
#[async_trait]
pub trait ChangeQuoteSource: Send + Sync {
    /// Fetch the change percentage for each id.
    ///
    /// Ids the service does not know, or that have no numeric change (suspended),
    /// are simply absent from the returned map.
    async fn fetch_change_pcts(
        &self,
        ids: &[SecurityId],
    ) -> Result<HashMap<SecurityId, Decimal>, MarketDataError>;
}
