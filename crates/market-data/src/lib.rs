//! FundPulse Market Data Crate
//!
//! Clients for the upstream services used to value a fund portfolio intraday:
//!
//! - Fund valuation endpoint: vendor's near-real-time NAV estimate per fund (JSONP)
//! - Holdings disclosure endpoint: a fund's published top-10 stock holdings (HTML table)
//! - Batch quote service: current change percentage for stocks and indices
//!
//! # Architecture
//!
//! ```text
//! +----------------------+     +---------------------------+
//! |  fundpulse-core      | --> |  provider traits          |  (ValuationSource, ...)
//! +----------------------+     +---------------------------+
//!                                          |
//!                                          v
//!                              +---------------------------+
//!                              |  clients (reqwest)        |  one module per upstream
//!                              +---------------------------+
//!                                          |
//!                                          v
//!                              +---------------------------+
//!                              |  parsers                  |  payload -> models
//!                              +---------------------------+
//! ```
//!
//! Every upstream payload is parsed by a free function next to its client, so format drift
//! is contained to that module and the parsers are testable without network access.

pub mod clients;
pub mod errors;
pub mod models;
pub mod provider;
pub mod utils;

pub use clients::{BatchQuoteClient, FundValuationClient, HoldingsDisclosureClient};
pub use errors::{ErrorKind, MarketDataError};
pub use models::{DisclosedHolding, FundValuation, Market, SecurityId};
pub use provider::{ChangeQuoteSource, HoldingsDisclosureSource, ValuationSource};
