//! Get-or-compute cache for estimator results using moka
//!
//! One cache per estimator kind, each with that kind's TTL. "Unavailable" results are cached
//! too, so a failing upstream is not hammered on every refresh. Concurrent requests for the
//! same code wait for the first computation instead of starting their own.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use moka::future::Cache;

use crate::estimates::{Estimate, EstimatorKind, FundEstimator};

/// Upper bound on cached funds per estimator kind
const MAX_ENTRIES_PER_KIND: u64 = 1000;

/// Lifetime of cached values, per estimator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub official: Duration,
    pub shadow: Duration,
}

impl CacheTtls {
    pub fn for_kind(&self, kind: EstimatorKind) -> Duration {
        match kind {
            EstimatorKind::Official => self.official,
            EstimatorKind::Shadow => self.shadow,
        }
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            official: EstimatorKind::Official.default_ttl(),
            shadow: EstimatorKind::Shadow.default_ttl(),
        }
    }
}

/// Estimate cache keyed by fund code, one moka cache per estimator kind
pub struct EstimateCache {
    ttls: CacheTtls,
    /// Vendor valuations (15 s TTL by default)
    official: Cache<String, Option<Estimate>>,
    /// Shadow reconstructions (1 hour TTL by default)
    shadow: Cache<String, Option<Estimate>>,
}

impl EstimateCache {
    pub fn new(ttls: CacheTtls) -> Self {
        Self {
            ttls,
            official: Cache::builder()
                .time_to_live(ttls.official)
                .max_capacity(MAX_ENTRIES_PER_KIND)
                .build(),
            shadow: Cache::builder()
                .time_to_live(ttls.shadow)
                .max_capacity(MAX_ENTRIES_PER_KIND)
                .build(),
        }
    }

    pub fn ttls(&self) -> CacheTtls {
        self.ttls
    }

    /// Get the estimate for `code` from `estimator`, computing it on a miss.
    pub async fn get(&self, estimator: &dyn FundEstimator, code: &str) -> Option<Estimate> {
        self.get_or_compute(estimator.kind(), code, move || estimator.estimate(code))
            .await
    }

    /// Return the stored value while it is fresh, otherwise run `compute` and store its result.
    pub async fn get_or_compute<F, Fut>(
        &self,
        kind: EstimatorKind,
        code: &str,
        compute: F,
    ) -> Option<Estimate>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<Estimate>>,
    {
        let init = async move {
            debug!("Estimate cache miss for {} {}", kind, code);
            compute().await
        };
        self.cache_for_kind(kind)
            .get_with(code.to_string(), init)
            .await
    }

    /// Drop the entry for one code
    pub async fn invalidate(&self, kind: EstimatorKind, code: &str) {
        self.cache_for_kind(kind).invalidate(code).await;
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.official.invalidate_all();
        self.shadow.invalidate_all();
    }

    /// Entry counts per estimator kind, after applying pending evictions.
    pub async fn stats(&self) -> CacheStats {
        self.official.run_pending_tasks().await;
        self.shadow.run_pending_tasks().await;
        CacheStats {
            official_count: self.official.entry_count() as usize,
            shadow_count: self.shadow.entry_count() as usize,
        }
    }

    fn cache_for_kind(&self, kind: EstimatorKind) -> &Cache<String, Option<Estimate>> {
        match kind {
            EstimatorKind::Official => &self.official,
            EstimatorKind::Shadow => &self.shadow,
        }
    }
}

impl Default for EstimateCache {
    fn default() -> Self {
        Self::new(CacheTtls::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub official_count: usize,
    pub shadow_count: usize,
}

impl CacheStats {
    pub fn total(&self) -> usize {
        self.official_count + self.shadow_count
    }
}

/// Thread-safe handle to an EstimateCache
pub type SharedEstimateCache = Arc<EstimateCache>;
