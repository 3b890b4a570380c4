//! Session settings and their defaults.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::estimates::EstimatorKind;

/// Default length of the rolling profit series (about half an hour at 15 s per refresh).
pub const DEFAULT_SERIES_CAPACITY: usize = 120;

/// Timeout applied to every upstream HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound for one holding's estimate; the shadow path issues two requests in sequence.
pub const DEFAULT_ESTIMATE_TIMEOUT: Duration = Duration::from_secs(12);

/// Maximum number of holdings estimated concurrently in one refresh.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Empirical average equity exposure of actively managed funds.
pub const DEFAULT_DAMPENING: Decimal = dec!(0.95);

/// Number of disclosed holdings used by the shadow estimator.
pub const DEFAULT_TOP_HOLDINGS: usize = 10;

/// Tunables for one monitoring session.
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub official_ttl: Duration,
    pub shadow_ttl: Duration,
    pub series_capacity: usize,
    pub request_timeout: Duration,
    pub estimate_timeout: Duration,
    pub max_concurrency: usize,
    pub dampening: Decimal,
    pub top_holdings: usize,
}

impl SessionSettings {
    /// Cache lifetime of an estimate produced by `kind`.
    pub fn ttl_for(&self, kind: EstimatorKind) -> Duration {
        match kind {
            EstimatorKind::Official => self.official_ttl,
            EstimatorKind::Shadow => self.shadow_ttl,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            official_ttl: EstimatorKind::Official.default_ttl(),
            shadow_ttl: EstimatorKind::Shadow.default_ttl(),
            series_capacity: DEFAULT_SERIES_CAPACITY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            estimate_timeout: DEFAULT_ESTIMATE_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            dampening: DEFAULT_DAMPENING,
            top_holdings: DEFAULT_TOP_HOLDINGS,
        }
    }
}
