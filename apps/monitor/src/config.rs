use std::{path::PathBuf, str::FromStr, time::Duration};

use fundpulse_core::{SessionSettings, ValuationMode};

pub struct Config {
    pub holdings_path: PathBuf,
    pub mode: ValuationMode,
    pub refresh_interval: Duration,
    pub settings: SessionSettings,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = SessionSettings::default();
        let secs = |key: &str, default: Duration| {
            parse_or(&lookup, key, default.as_secs()).max(1)
        };

        let settings = SessionSettings {
            official_ttl: Duration::from_secs(secs("FP_OFFICIAL_TTL_SECS", defaults.official_ttl)),
            shadow_ttl: Duration::from_secs(secs("FP_SHADOW_TTL_SECS", defaults.shadow_ttl)),
            series_capacity: parse_or(&lookup, "FP_SERIES_CAPACITY", defaults.series_capacity),
            request_timeout: Duration::from_millis(parse_or(
                &lookup,
                "FP_REQUEST_TIMEOUT_MS",
                defaults.request_timeout.as_millis() as u64,
            )),
            max_concurrency: parse_or(&lookup, "FP_MAX_CONCURRENCY", defaults.max_concurrency),
            ..defaults
        };

        Self {
            holdings_path: lookup("FP_HOLDINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("portfolio.json")),
            mode: parse_or(&lookup, "FP_MODE", ValuationMode::Official),
            refresh_interval: Duration::from_secs(parse_or(&lookup, "FP_REFRESH_INTERVAL_SECS", 15u64).max(1)),
            settings,
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
