//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The error enum returned by every client and parser
//! - [`ErrorKind`]: Coarse classification used by callers to decide how to degrade

use thiserror::Error;

/// Errors that can occur while talking to an upstream market data service.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Connection refused, DNS failure, body read failure, etc.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("Timeout: {source_name}")]
    Timeout {
        /// The upstream that timed out
        source_name: String,
    },

    /// The upstream answered with a non-success HTTP status.
    #[error("HTTP {status} from {source_name}")]
    HttpStatus {
        /// The upstream that answered
        source_name: String,
        /// The status code it returned
        status: u16,
    },

    /// The payload did not have the expected wrapper, markup or JSON shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The payload was well formed but carried nothing usable
    /// (empty holdings table, no matching quotes, missing benchmark).
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
}

/// Coarse failure taxonomy shared with the estimators.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Timeout, connection refusal, non-success status.
    Network,
    /// Response shape mismatch.
    Parse,
    /// Empty holdings table or no matching quotes.
    DataUnavailable,
}

impl MarketDataError {
    /// Returns the taxonomy bucket for this error.
    ///
    /// ```
    /// use fundpulse_market_data::errors::{ErrorKind, MarketDataError};
    ///
    /// let error = MarketDataError::HttpStatus { source_name: "fundgz".to_string(), status: 502 };
    /// assert_eq!(error.kind(), ErrorKind::Network);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) | Self::Timeout { .. } | Self::HttpStatus { .. } => ErrorKind::Network,
            Self::Parse(_) => ErrorKind::Parse,
            Self::DataUnavailable(_) => ErrorKind::DataUnavailable,
        }
    }

    /// Converts a reqwest failure, keeping timeouts distinguishable from other network errors.
    pub fn from_request(source_name: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                source_name: source_name.to_string(),
            }
        } else {
            Self::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_network_kind() {
        let error = MarketDataError::Timeout {
            source_name: "fundgz".to_string(),
        };
        assert_eq!(error.kind(), ErrorKind::Network);
    }

    #[test]
    fn test_parse_kind() {
        let error = MarketDataError::Parse("missing jsonp wrapper".to_string());
        assert_eq!(error.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_data_unavailable_kind() {
        let error = MarketDataError::DataUnavailable("empty holdings table".to_string());
        assert_eq!(error.kind(), ErrorKind::DataUnavailable);
    }

    #[test]
    fn test_http_status_message() {
        let error = MarketDataError::HttpStatus {
            source_name: "push2".to_string(),
            status: 503,
        };
        assert_eq!(error.to_string(), "HTTP 503 from push2");
    }
}
