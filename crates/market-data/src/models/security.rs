use std::fmt;

use serde::{Deserialize, Serialize};

/// Exchange routing used by the batch quote service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    Shenzhen,
    Shanghai,
    HongKong,
}

impl Market {
    /// Numeric market prefix used in quote service ids.
    pub fn prefix(&self) -> u8 {
        match self {
            Market::Shenzhen => 0,
            Market::Shanghai => 1,
            Market::HongKong => 116,
        }
    }

    pub fn from_prefix(prefix: i64) -> Option<Self> {
        match prefix {
            0 => Some(Market::Shenzhen),
            1 => Some(Market::Shanghai),
            116 => Some(Market::HongKong),
            _ => None,
        }
    }
}

/// A stock or index as addressed by the batch quote service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecurityId {
    pub market: Market,
    pub code: String,
}

impl SecurityId {
    pub fn new(market: Market, code: impl Into<String>) -> Self {
        Self {
            market,
            code: code.into(),
        }
    }

    /// Routes a stock code to its exchange.
    ///
    /// Five-digit codes are Hong Kong listings (Stock Connect holdings). Among six-digit
    /// codes, Shanghai listings start with 6 (A shares), 9 (B shares) or 5 (funds);
    /// everything else, including Beijing listings, is served under the Shenzhen prefix.
    pub fn stock(code: &str) -> Self {
        let market = if is_hong_kong_code(code) {
            Market::HongKong
        } else {
            match code.chars().next() {
                Some('6') | Some('9') | Some('5') => Market::Shanghai,
                _ => Market::Shenzhen,
            }
        };
        Self::new(market, code)
    }

    /// CSI 300, the broad-market benchmark.
    pub fn csi_300() -> Self {
        Self::new(Market::Shanghai, "000300")
    }

    /// ChiNext index, the growth-style benchmark.
    pub fn chinext() -> Self {
        Self::new(Market::Shenzhen, "399006")
    }

    /// Id in the `market.code` form expected by the quote service.
    pub fn secid(&self) -> String {
        format!("{}.{}", self.market.prefix(), self.code)
    }
}

impl fmt::Display for SecurityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.secid())
    }
}

/// Hong Kong stock codes are five digits, A-share codes six.
pub fn is_hong_kong_code(code: &str) -> bool {
    code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())
}
