//! HTTP clients for the fund data upstreams

pub mod disclosure_client;
pub mod quote_client;
pub mod valuation_client;

pub use disclosure_client::HoldingsDisclosureClient;
pub use quote_client::BatchQuoteClient;
pub use valuation_client::FundValuationClient;
