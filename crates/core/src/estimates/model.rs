use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fundpulse_market_data::{ErrorKind, FundValuation};

/// The vendor's valuation is used as-is for the official path.
pub type OfficialEstimate = FundValuation;

/// Which estimator produced a value; also the first half of a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstimatorKind {
    Official,
    Shadow,
}

impl EstimatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimatorKind::Official => "OFFICIAL",
            EstimatorKind::Shadow => "SHADOW",
        }
    }

    /// Default cache lifetime for estimates of this kind
    pub fn default_ttl(&self) -> Duration {
        match self {
            EstimatorKind::Official => Duration::from_secs(15),
            // Disclosed holdings change quarterly; re-scraping every refresh is wasted work
            EstimatorKind::Shadow => Duration::from_secs(3600),
        }
    }
}

impl FromStr for EstimatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OFFICIAL" => Ok(EstimatorKind::Official),
            "SHADOW" => Ok(EstimatorKind::Shadow),
            _ => Err(format!("Unknown estimator kind: {}", s)),
        }
    }
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a shadow estimate came about.
///
/// A fallback carries the value `0.0`, exactly like a genuinely flat estimate, and is summed
/// the same way. The status is the only place the two can be told apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EstimateStatus {
    Computed,
    Fallback { kind: FailureKind, reason: String },
}

/// Serializable mirror of [`ErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Network,
    Parse,
    DataUnavailable,
}

impl From<ErrorKind> for FailureKind {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Network => FailureKind::Network,
            ErrorKind::Parse => FailureKind::Parse,
            ErrorKind::DataUnavailable => FailureKind::DataUnavailable,
        }
    }
}

/// Approximate change percentage reconstructed from disclosed holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowEstimate {
    pub change_pct: Decimal,
    pub status: EstimateStatus,
}

impl ShadowEstimate {
    pub fn computed(change_pct: Decimal) -> Self {
        Self {
            change_pct,
            status: EstimateStatus::Computed,
        }
    }

    pub fn fallback(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self {
            change_pct: Decimal::ZERO,
            status: EstimateStatus::Fallback {
                kind: kind.into(),
                reason: reason.into(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.status, EstimateStatus::Fallback { .. })
    }
}

/// A cached estimator result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Estimate {
    Official(OfficialEstimate),
    Shadow(ShadowEstimate),
}

impl Estimate {
    pub fn kind(&self) -> EstimatorKind {
        match self {
            Estimate::Official(_) => EstimatorKind::Official,
            Estimate::Shadow(_) => EstimatorKind::Shadow,
        }
    }

    pub fn change_pct(&self) -> Decimal {
        match self {
            Estimate::Official(v) => v.change_pct,
            Estimate::Shadow(s) => s.change_pct,
        }
    }
}
