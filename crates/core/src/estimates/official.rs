//! Official path: the vendor's own intraday valuation.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use fundpulse_market_data::ValuationSource;

use super::model::{Estimate, EstimatorKind};
use super::traits::FundEstimator;

pub struct OfficialEstimator {
    source: Arc<dyn ValuationSource>,
}

impl OfficialEstimator {
    pub fn new(source: Arc<dyn ValuationSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl FundEstimator for OfficialEstimator {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Official
    }

    async fn estimate(&self, code: &str) -> Option<Estimate> {
        match self.source.fetch_valuation(code).await {
            Ok(valuation) => Some(Estimate::Official(valuation)),
            Err(e) => {
                warn!("Official valuation unavailable for {} ({:?}): {}", code, e.kind(), e);
                None
            }
        }
    }
}
