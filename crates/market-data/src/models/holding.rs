use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a fund's published top holdings.
///
/// This is the whole contract between the disclosure scraper and the shadow estimator;
/// markup changes upstream must not leak past it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisclosedHolding {
    /// Stock code, zero-padded to six digits
    pub stock_code: String,

    /// Stock name as published
    pub name: String,

    /// Share of the fund's net asset value, in percent
    pub weight_pct: Decimal,
}
