//! In-memory estimate cache with per-estimator TTL.

pub mod quote_cache;

pub use quote_cache::{CacheStats, CacheTtls, EstimateCache, SharedEstimateCache};
