//! Portfolio valuation: per-position and total profit for one refresh.

pub mod aggregator;
pub mod model;

pub use aggregator::PortfolioAggregator;
pub use model::{PortfolioSnapshot, PortfolioValuation, PositionResult, ValuationMode};
