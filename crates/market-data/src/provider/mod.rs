//! Source abstractions consumed by the estimators.
//!
//! The estimators in `fundpulse-core` only see these traits; the reqwest clients in
//! [`crate::clients`] are one implementation, test doubles are another.

mod traits;

pub use traits::{ChangeQuoteSource, HoldingsDisclosureSource, ValuationSource};
