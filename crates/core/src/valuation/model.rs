use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::estimates::EstimatorKind;
use crate::holdings::Holding;

/// Which estimator drives a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationMode {
    Official,
    Shadow,
}

impl ValuationMode {
    pub fn estimator_kind(&self) -> EstimatorKind {
        match self {
            ValuationMode::Official => EstimatorKind::Official,
            ValuationMode::Shadow => EstimatorKind::Shadow,
        }
    }
}

impl FromStr for ValuationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<EstimatorKind>() {
            Ok(EstimatorKind::Official) => Ok(ValuationMode::Official),
            Ok(EstimatorKind::Shadow) => Ok(ValuationMode::Shadow),
            Err(_) => Err(format!("Unknown valuation mode: {}", s)),
        }
    }
}

impl fmt::Display for ValuationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.estimator_kind())
    }
}

/// Outcome for one holding in one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionResult {
    pub holding: Holding,
    /// Zero when unavailable; unavailable positions are excluded from totals
    pub profit: Decimal,
    /// `None` when unavailable
    pub change_pct: Option<Decimal>,
    pub available: bool,
    /// Set when the shadow estimator fell back to `0.0`; the position is still summed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl PositionResult {
    pub fn unavailable(holding: Holding) -> Self {
        Self {
            holding,
            profit: Decimal::ZERO,
            change_pct: None,
            available: false,
            fallback_reason: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Portfolio totals at one refresh.
///
/// `total_asset` is only known in official mode; shadow mode has no unit price and leaves it
/// at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub timestamp: DateTime<Utc>,
    pub mode: ValuationMode,
    pub total_profit: Decimal,
    pub total_asset: Decimal,
}

/// Everything a refresh produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub snapshot: PortfolioSnapshot,
    pub positions: Vec<PositionResult>,
}

impl PortfolioValuation {
    pub fn unavailable_positions(&self) -> impl Iterator<Item = &PositionResult> {
        self.positions.iter().filter(|p| !p.available)
    }

    pub fn fallback_positions(&self) -> impl Iterator<Item = &PositionResult> {
        self.positions.iter().filter(|p| p.is_fallback())
    }
}
