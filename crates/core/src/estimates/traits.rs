use async_trait::async_trait;

use super::model::{Estimate, EstimatorKind};

/// A source of per-fund estimates, as seen by the cache and the aggregator.
///
/// Implementations must not fail: errors are absorbed at this boundary and turned into
/// `None` ("unavailable") or a fallback value, depending on the estimator.
#[async_trait]
pub trait FundEstimator: Send + Sync {
    fn kind(&self) -> EstimatorKind;

    async fn estimate(&self, code: &str) -> Option<Estimate>;
}
