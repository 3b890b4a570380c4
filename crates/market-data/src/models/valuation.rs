use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Vendor-supplied near-real-time valuation for one fund.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundValuation {
    /// Fund code the valuation was requested for
    pub code: String,

    /// Display name
    pub name: String,

    /// Current estimated NAV (`gsz`)
    pub estimated_nav: Decimal,

    /// Previous confirmed NAV (`dwjz`)
    pub previous_nav: Decimal,

    /// Estimated change in percent (`gszzl`)
    pub change_pct: Decimal,

    /// Vendor timestamp of the estimate (`gztime`), when present and parsable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDateTime>,
}

impl FundValuation {
    /// Absolute NAV move per unit since the previous confirmed NAV.
    pub fn nav_change(&self) -> Decimal {
        self.estimated_nav - self.previous_nav
    }
}
