//! FundPulse Core - intraday profit estimation for a portfolio of funds.
//!
//! When a fund's own intraday valuation is unavailable, its change can be approximated from
//! the stocks it discloses as top holdings plus the move of a benchmark index. This crate
//! holds both estimation paths, the freshness cache in front of them, the per-portfolio
//! aggregation and the bounded series that feeds a live chart.
//!
//! # Architecture
//!
//! ```text
//! MonitorSession ──> PortfolioAggregator ──> EstimateCache ──> FundEstimator
//!      │                                                        ├─ OfficialEstimator
//!      ├─ HoldingsStore                                         └─ ShadowEstimator
//!      └─ RollingSeries                                              │
//!                                                     fundpulse-market-data sources
//! ```
//!
//! - [`estimates`] - Official and shadow estimators, growth classifier
//! - [`cache`] - Get-or-compute cache keyed by (estimator kind, fund code)
//! - [`valuation`] - Fan-out/join aggregation into positions and totals
//! - [`series`] - Bounded rolling profit series
//! - [`holdings`] - Holding model and persistence
//! - [`session`] - Session facade tying the above together
//!
//! # Known approximations
//!
//! Shadow-mode profit is `change% / 100 × shares`, i.e. every fund is assumed to have a unit
//! price of 1. Shadow failures are reported as a `0.0` estimate with a fallback status.

pub mod cache;
pub mod errors;
pub mod estimates;
pub mod holdings;
pub mod series;
pub mod session;
pub mod settings;
pub mod valuation;

pub use cache::{EstimateCache, SharedEstimateCache};
pub use errors::{Error, Result, ValidationError};
pub use estimates::{Estimate, EstimateStatus, EstimatorKind, ShadowEstimate};
pub use holdings::{Holding, HoldingsStore, InMemoryHoldingsStore, JsonHoldingsStore};
pub use series::{RollingSeries, SeriesPoint};
pub use session::MonitorSession;
pub use settings::SessionSettings;
pub use valuation::{PortfolioSnapshot, PortfolioValuation, PositionResult, ValuationMode};
