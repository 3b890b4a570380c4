//! Shadow path: approximate a fund's change from its disclosed top holdings.
//!
//! ```text
//! top_weight        = Σ weight_i                       (holdings with a quote)
//! top_contribution  = Σ weight_i × change_i / 100
//! raw               = top_contribution + (100 − top_weight) × anchor_change / 100
//! estimate          = round(raw × dampening, 2)
//! ```
//!
//! The undisclosed remainder of the fund (smaller positions, cash, bonds) is assumed to move
//! with an anchor index: the growth index when any top holding is a growth-sector name, the
//! broad-market index otherwise. Dampening accounts for funds rarely being fully invested.
//!
//! Any failure along the way produces a `0.0` fallback estimate. A genuinely flat fund and a
//! failed estimate therefore have the same value; only [`EstimateStatus`] separates them.
//!
//! [`EstimateStatus`]: super::model::EstimateStatus

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fundpulse_market_data::{
    ChangeQuoteSource, DisclosedHolding, HoldingsDisclosureSource, MarketDataError, SecurityId,
};

use super::classifier::{KeywordClassifier, SectorClassifier};
use super::model::{Estimate, EstimatorKind, ShadowEstimate};
use super::traits::FundEstimator;
use crate::settings::{DEFAULT_DAMPENING, DEFAULT_TOP_HOLDINGS};

const HUNDRED: Decimal = dec!(100);

/// Blend the disclosed part of a fund with its anchor index and dampen the result.
///
/// ```
/// use fundpulse_core::estimates::blend_estimate;
/// use rust_decimal_macros::dec;
///
/// // raw = 1.8 + 40 × 0.5 / 100 = 2.0, final = 2.0 × 0.95
/// assert_eq!(blend_estimate(dec!(60), dec!(1.8), dec!(0.5), dec!(0.95)), dec!(1.90));
/// ```
pub fn blend_estimate(
    top_weight: Decimal,
    top_contribution: Decimal,
    anchor_change_pct: Decimal,
    dampening: Decimal,
) -> Decimal {
    let raw = top_contribution + (HUNDRED - top_weight) * anchor_change_pct / HUNDRED;
    let mut estimate = (raw * dampening).round_dp(2);
    estimate.rescale(2);
    estimate
}

pub struct ShadowEstimator {
    disclosures: Arc<dyn HoldingsDisclosureSource>,
    quotes: Arc<dyn ChangeQuoteSource>,
    classifier: Arc<dyn SectorClassifier>,
    broad_index: SecurityId,
    growth_index: SecurityId,
    dampening: Decimal,
    top_holdings: usize,
}

impl ShadowEstimator {
    /// Estimator with the default classifier, CSI 300 / ChiNext anchors and 0.95 dampening.
    pub fn new(
        disclosures: Arc<dyn HoldingsDisclosureSource>,
        quotes: Arc<dyn ChangeQuoteSource>,
    ) -> Self {
        Self {
            disclosures,
            quotes,
            classifier: Arc::new(KeywordClassifier::default()),
            broad_index: SecurityId::csi_300(),
            growth_index: SecurityId::chinext(),
            dampening: DEFAULT_DAMPENING,
            top_holdings: DEFAULT_TOP_HOLDINGS,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn SectorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_dampening(mut self, dampening: Decimal) -> Self {
        self.dampening = dampening;
        self
    }

    pub fn with_top_holdings(mut self, top_holdings: usize) -> Self {
        self.top_holdings = top_holdings;
        self
    }

    pub fn with_anchors(mut self, broad_index: SecurityId, growth_index: SecurityId) -> Self {
        self.broad_index = broad_index;
        self.growth_index = growth_index;
        self
    }

    /// Compute the estimate, surfacing the first failure instead of falling back.
    pub async fn try_estimate(&self, code: &str) -> Result<Decimal, MarketDataError> {
        let holdings = self
            .disclosures
            .fetch_top_holdings(code, self.top_holdings)
            .await?;
        if holdings.is_empty() {
            return Err(MarketDataError::DataUnavailable(format!(
                "no disclosed holdings for {}",
                code
            )));
        }

        let mut ids: Vec<SecurityId> = holdings
            .iter()
            .map(|h| SecurityId::stock(&h.stock_code))
            .collect();
        ids.push(self.broad_index.clone());
        ids.push(self.growth_index.clone());

        let quotes = self.quotes.fetch_change_pcts(&ids).await?;

        // Holdings without a quote drop out here; their weight joins the anchored remainder.
        let matched: Vec<(&DisclosedHolding, Decimal)> = holdings
            .iter()
            .filter_map(|h| {
                quotes
                    .get(&SecurityId::stock(&h.stock_code))
                    .map(|change| (h, *change))
            })
            .collect();
        if matched.is_empty() {
            return Err(MarketDataError::DataUnavailable(format!(
                "no quotes matched the holdings of {}",
                code
            )));
        }

        let top_weight: Decimal = matched.iter().map(|(h, _)| h.weight_pct).sum();
        let top_contribution: Decimal = matched
            .iter()
            .map(|(h, change)| h.weight_pct * change)
            .sum::<Decimal>()
            / HUNDRED;

        let is_growth = matched
            .iter()
            .any(|(h, _)| self.classifier.is_growth(&h.name));
        let anchor = if is_growth {
            &self.growth_index
        } else {
            &self.broad_index
        };
        let anchor_change = quotes.get(anchor).copied().ok_or_else(|| {
            MarketDataError::DataUnavailable(format!("no quote for anchor index {}", anchor))
        })?;

        let estimate = blend_estimate(top_weight, top_contribution, anchor_change, self.dampening);
        debug!(
            "Shadow estimate for {}: {} holdings matched, weight {}, contribution {}, anchor {} {} -> {}",
            code,
            matched.len(),
            top_weight,
            top_contribution,
            anchor,
            anchor_change,
            estimate
        );

        Ok(estimate)
    }
}

#[async_trait]
impl FundEstimator for ShadowEstimator {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Shadow
    }

    async fn estimate(&self, code: &str) -> Option<Estimate> {
        let estimate = match self.try_estimate(code).await {
            Ok(change_pct) => ShadowEstimate::computed(change_pct),
            Err(e) => {
                warn!("Shadow estimate for {} fell back to 0.0: {}", code, e);
                ShadowEstimate::fallback(e.kind(), e.to_string())
            }
        };
        Some(Estimate::Shadow(estimate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimates::model::{EstimateStatus, FailureKind};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeDisclosures {
        holdings: Result<Vec<DisclosedHolding>, String>,
    }

    #[async_trait]
    impl HoldingsDisclosureSource for FakeDisclosures {
        async fn fetch_top_holdings(
            &self,
            _code: &str,
            limit: usize,
        ) -> Result<Vec<DisclosedHolding>, MarketDataError> {
            match &self.holdings {
                Ok(h) => Ok(h.iter().take(limit).cloned().collect()),
                Err(msg) => Err(MarketDataError::Timeout {
                    source_name: msg.clone(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct FakeQuotes {
        quotes: HashMap<SecurityId, Decimal>,
        requested: Mutex<Vec<SecurityId>>,
    }

    #[async_trait]
    impl ChangeQuoteSource for FakeQuotes {
        async fn fetch_change_pcts(
            &self,
            ids: &[SecurityId],
        ) -> Result<HashMap<SecurityId, Decimal>, MarketDataError> {
            self.requested.lock().unwrap().extend_from_slice(ids);
            Ok(ids
                .iter()
                .filter_map(|id| self.quotes.get(id).map(|c| (id.clone(), *c)))
                .collect())
        }
    }

    fn holding(code: &str, name: &str, weight: Decimal) -> DisclosedHolding {
        DisclosedHolding {
            stock_code: code.to_string(),
            name: name.to_string(),
            weight_pct: weight,
        }
    }

    fn quotes(entries: &[(SecurityId, Decimal)]) -> Arc<FakeQuotes> {
        Arc::new(FakeQuotes {
            quotes: entries.iter().cloned().collect(),
            ..Default::default()
        })
    }

    fn estimator(holdings: Vec<DisclosedHolding>, quotes: Arc<FakeQuotes>) -> ShadowEstimator {
        ShadowEstimator::new(
            Arc::new(FakeDisclosures {
                holdings: Ok(holdings),
            }),
            quotes,
        )
    }

    #[test]
    fn test_blend_reference_values() {
        // weight 60, contribution 1.8, anchor 0.5 -> raw 2.0 -> 1.90
        assert_eq!(blend_estimate(dec!(60), dec!(1.8), dec!(0.5), dec!(0.95)), dec!(1.90));
    }

    #[test]
    fn test_blend_rounds_to_two_places() {
        let estimate = blend_estimate(dec!(47.31), dec!(0.8123), dec!(-0.377), dec!(0.95));
        assert_eq!(estimate.scale(), 2);
        // raw = 0.8123 + 52.69 × -0.377 / 100 = 0.6136587, × 0.95 = 0.58297...
        assert_eq!(estimate, dec!(0.58));
    }

    #[test]
    fn test_blend_fully_disclosed_ignores_anchor() {
        let estimate = blend_estimate(dec!(100), dec!(1), dec!(9.99), dec!(1));
        assert_eq!(estimate.to_string(), "1.00");
    }

    #[tokio::test]
    async fn test_broad_market_anchor() {
        let q = quotes(&[
            (SecurityId::stock("600519"), dec!(2)),
            (SecurityId::stock("000858"), dec!(4)),
            (SecurityId::csi_300(), dec!(0.5)),
            (SecurityId::chinext(), dec!(3)),
        ]);
        let shadow = estimator(
            vec![
                holding("600519", "贵州茅台", dec!(30)),
                holding("000858", "五粮液", dec!(30)),
            ],
            q,
        );

        // weight 60, contribution (60 + 120) / 100 = 1.8, anchor CSI 300 0.5 -> 1.90
        assert_eq!(shadow.try_estimate("001186").await.unwrap(), dec!(1.90));
    }

    #[tokio::test]
    async fn test_growth_keyword_selects_growth_anchor() {
        let q = quotes(&[
            (SecurityId::stock("600519"), dec!(2)),
            (SecurityId::stock("300750"), dec!(4)),
            (SecurityId::csi_300(), dec!(0.5)),
            (SecurityId::chinext(), dec!(3)),
        ]);
        let shadow = estimator(
            vec![
                holding("600519", "贵州茅台", dec!(30)),
                holding("300750", "宁德时代", dec!(30)),
            ],
            q,
        );

        // raw = 1.8 + 40 × 3 / 100 = 3.0 -> 2.85
        assert_eq!(shadow.try_estimate("001186").await.unwrap(), dec!(2.85));
    }

    #[tokio::test]
    async fn test_custom_classifier_replaces_keywords() {
        let q = quotes(&[
            (SecurityId::stock("300750"), dec!(0)),
            (SecurityId::csi_300(), dec!(1)),
            (SecurityId::chinext(), dec!(-1)),
        ]);
        let never_growth: Arc<dyn SectorClassifier> = Arc::new(|_: &str| false);
        let shadow = estimator(vec![holding("300750", "宁德时代", dec!(50))], q)
            .with_classifier(never_growth);

        // anchor falls back to CSI 300: 50 × 1 / 100 × 0.95
        assert_eq!(shadow.try_estimate("001186").await.unwrap(), dec!(0.48));
    }

    #[tokio::test]
    async fn test_unquoted_holding_weight_joins_remainder() {
        let q = quotes(&[
            (SecurityId::stock("600519"), dec!(2)),
            (SecurityId::csi_300(), dec!(1)),
            (SecurityId::chinext(), dec!(0)),
        ]);
        let shadow = estimator(
            vec![
                holding("600519", "贵州茅台", dec!(30)),
                holding("00700", "腾讯控股", dec!(30)),
            ],
            q,
        )
        .with_dampening(dec!(1));

        // weight 30, contribution 0.6, remainder 70 × 1 / 100 = 0.7
        assert_eq!(shadow.try_estimate("001186").await.unwrap(), dec!(1.30));
    }

    #[tokio::test]
    async fn test_requests_holdings_and_both_benchmarks() {
        let q = quotes(&[(SecurityId::stock("600519"), dec!(1))]);
        let shadow = estimator(vec![holding("600519", "贵州茅台", dec!(10))], q.clone());

        let _ = shadow.try_estimate("001186").await;

        let requested = q.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec![
                SecurityId::stock("600519"),
                SecurityId::csi_300(),
                SecurityId::chinext()
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_anchor_falls_back() {
        let q = quotes(&[(SecurityId::stock("600519"), dec!(1))]);
        let shadow = estimator(vec![holding("600519", "贵州茅台", dec!(10))], q);

        let err = shadow.try_estimate("001186").await.unwrap_err();
        assert!(matches!(err, MarketDataError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_no_matching_quotes_falls_back_to_zero() {
        let q = quotes(&[(SecurityId::csi_300(), dec!(1)), (SecurityId::chinext(), dec!(1))]);
        let shadow = estimator(vec![holding("600519", "贵州茅台", dec!(10))], q);

        let Some(Estimate::Shadow(estimate)) = shadow.estimate("001186").await else {
            panic!("shadow estimator must always produce a shadow estimate");
        };
        assert_eq!(estimate.change_pct, Decimal::ZERO);
        assert!(matches!(
            estimate.status,
            EstimateStatus::Fallback {
                kind: FailureKind::DataUnavailable,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_network_failure_falls_back_to_zero() {
        let shadow = ShadowEstimator::new(
            Arc::new(FakeDisclosures {
                holdings: Err("disclosure".to_string()),
            }),
            quotes(&[]),
        );

        let Some(Estimate::Shadow(estimate)) = shadow.estimate("001186").await else {
            panic!("shadow estimator must always produce a shadow estimate");
        };
        assert_eq!(estimate.change_pct, Decimal::ZERO);
        assert!(matches!(
            estimate.status,
            EstimateStatus::Fallback {
                kind: FailureKind::Network,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_disclosure_falls_back() {
        let shadow = estimator(vec![], quotes(&[]));
        let err = shadow.try_estimate("001186").await.unwrap_err();
        assert!(matches!(err, MarketDataError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_computed_estimate_is_flagged_computed() {
        let q = quotes(&[
            (SecurityId::stock("600519"), dec!(0)),
            (SecurityId::csi_300(), dec!(0)),
            (SecurityId::chinext(), dec!(0)),
        ]);
        let shadow = estimator(vec![holding("600519", "贵州茅台", dec!(10))], q);

        // A real flat market: same value as a fallback, different status
        let Some(Estimate::Shadow(estimate)) = shadow.estimate("001186").await else {
            panic!("shadow estimator must always produce a shadow estimate");
        };
        assert_eq!(estimate.change_pct, Decimal::ZERO);
        assert_eq!(estimate.status, EstimateStatus::Computed);
    }
}
