//! Fund estimators.
//!
//! - [`official`] - Vendor valuation, "unavailable" on any failure
//! - [`shadow`] - Reconstruction from disclosed top holdings and index anchoring
//! - [`classifier`] - Growth-sector classification used to pick the anchor index
//! - [`model`] - Estimate types shared with the cache and the aggregator

pub mod classifier;
pub mod model;
pub mod official;
pub mod shadow;
mod traits;

pub use classifier::{KeywordClassifier, SectorClassifier};
pub use model::{
    Estimate, EstimateStatus, EstimatorKind, FailureKind, OfficialEstimate, ShadowEstimate,
};
pub use official::OfficialEstimator;
pub use shadow::{blend_estimate, ShadowEstimator};
pub use traits::FundEstimator;
