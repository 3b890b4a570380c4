//! Core error types.
//!
//! Estimation failures never surface through these types: the estimators convert them into
//! "unavailable" or fallback values at their boundary. What remains are holdings management
//! and construction errors.

use thiserror::Error;

use fundpulse_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Holdings store failed: {0}")]
    Storage(String),

    #[error("Market data client setup failed: {0}")]
    MarketData(#[from] MarketDataError),
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Fund code must be 6 digits, got {0:?}")]
    InvalidFundCode(String),

    #[error("Shares must be a non-negative number, got {0}")]
    InvalidShares(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
