//! Data models returned by the market data clients.

mod holding;
mod security;
mod valuation;

pub use holding::DisclosedHolding;
pub use security::{is_hong_kong_code, Market, SecurityId};
pub use valuation::FundValuation;
