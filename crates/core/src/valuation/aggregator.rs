//! Fan-out/join valuation of a portfolio.
//!
//! Each holding is estimated through the cache as an independent future, at most
//! `max_concurrency` at a time, each bounded by `estimate_timeout`. Results are joined in
//! portfolio order before summing.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use log::{info, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fundpulse_market_data::ErrorKind;

use super::model::{PortfolioSnapshot, PortfolioValuation, PositionResult, ValuationMode};
use crate::cache::EstimateCache;
use crate::estimates::{Estimate, EstimateStatus, EstimatorKind, FundEstimator, ShadowEstimate};
use crate::holdings::Holding;

const HUNDRED: Decimal = dec!(100);

pub struct PortfolioAggregator {
    cache: Arc<EstimateCache>,
    official: Arc<dyn FundEstimator>,
    shadow: Arc<dyn FundEstimator>,
    max_concurrency: usize,
    estimate_timeout: Duration,
}

impl PortfolioAggregator {
    pub fn new(
        cache: Arc<EstimateCache>,
        official: Arc<dyn FundEstimator>,
        shadow: Arc<dyn FundEstimator>,
        max_concurrency: usize,
        estimate_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            official,
            shadow,
            max_concurrency: max_concurrency.max(1),
            estimate_timeout,
        }
    }

    fn estimator_for(&self, mode: ValuationMode) -> &dyn FundEstimator {
        match mode {
            ValuationMode::Official => self.official.as_ref(),
            ValuationMode::Shadow => self.shadow.as_ref(),
        }
    }

    /// Value every holding with the estimator selected by `mode`.
    pub async fn value_portfolio(
        &self,
        holdings: &[Holding],
        mode: ValuationMode,
    ) -> PortfolioValuation {
        let estimator = self.estimator_for(mode);

        let estimates: Vec<Option<Estimate>> = stream::iter(holdings)
            .map(|holding| self.estimate_holding(estimator, &holding.code))
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut total_profit = Decimal::ZERO;
        let mut total_asset = Decimal::ZERO;
        let mut positions = Vec::with_capacity(holdings.len());

        for (holding, estimate) in holdings.iter().zip(estimates) {
            let position = match estimate {
                None => PositionResult::unavailable(holding.clone()),
                Some(Estimate::Official(valuation)) => {
                    total_asset += valuation.estimated_nav * holding.shares;
                    PositionResult {
                        holding: holding.clone(),
                        profit: valuation.nav_change() * holding.shares,
                        change_pct: Some(valuation.change_pct),
                        available: true,
                        fallback_reason: None,
                    }
                }
                Some(Estimate::Shadow(shadow)) => {
                    // Unit price is unknown in shadow mode and taken as 1
                    let fallback_reason = match shadow.status {
                        EstimateStatus::Computed => None,
                        EstimateStatus::Fallback { reason, .. } => Some(reason),
                    };
                    PositionResult {
                        holding: holding.clone(),
                        profit: shadow.change_pct / HUNDRED * holding.shares,
                        change_pct: Some(shadow.change_pct),
                        available: true,
                        fallback_reason,
                    }
                }
            };

            if position.available {
                total_profit += position.profit;
            }
            positions.push(position);
        }

        let valuation = PortfolioValuation {
            snapshot: PortfolioSnapshot {
                timestamp: Utc::now(),
                mode,
                total_profit,
                total_asset,
            },
            positions,
        };

        info!(
            "Valued {} holdings in {} mode: profit {}, asset {}, {} unavailable, {} fallback",
            holdings.len(),
            mode,
            total_profit.round_dp(2),
            total_asset.round_dp(2),
            valuation.unavailable_positions().count(),
            valuation.fallback_positions().count()
        );

        valuation
    }

    async fn estimate_holding(&self, estimator: &dyn FundEstimator, code: &str) -> Option<Estimate> {
        match tokio::time::timeout(self.estimate_timeout, self.cache.get(estimator, code)).await {
            Ok(estimate) => estimate,
            Err(_) => {
                warn!(
                    "{} estimate for {} timed out after {:?}",
                    estimator.kind(),
                    code,
                    self.estimate_timeout
                );
                match estimator.kind() {
                    EstimatorKind::Official => None,
                    EstimatorKind::Shadow => Some(Estimate::Shadow(ShadowEstimate::fallback(
                        ErrorKind::Network,
                        format!("timed out after {:?}", self.estimate_timeout),
                    ))),
                }
            }
        }
    }
}
