use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// A position in one fund.
///
/// Deserialization runs the same validation as [`Holding::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHolding")]
pub struct Holding {
    /// Six-digit fund code
    pub code: String,
    pub name: String,
    /// Units held, never negative
    pub shares: Decimal,
}

impl Holding {
    /// Build a validated holding.
    pub fn new(code: &str, name: &str, shares: Decimal) -> Result<Self> {
        let code = code.trim();
        if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidFundCode(code.to_string()).into());
        }
        if shares.is_sign_negative() && !shares.is_zero() {
            return Err(ValidationError::InvalidShares(shares.to_string()).into());
        }

        Ok(Self {
            code: code.to_string(),
            name: name.trim().to_string(),
            shares,
        })
    }
}

/// Unvalidated on-disk form of a holding
#[derive(Deserialize)]
struct RawHolding {
    code: String,
    name: String,
    shares: Decimal,
}

impl TryFrom<RawHolding> for Holding {
    type Error = Error;

    fn try_from(raw: RawHolding) -> Result<Self> {
        Holding::new(&raw.code, &raw.name, raw.shares)
    }
}
