use std::sync::Arc;

use fundpulse_core::{JsonHoldingsStore, MonitorSession};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub fn init_tracing() {
    let log_format = std::env::var("FP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_session(config: &Config) -> anyhow::Result<Arc<MonitorSession>> {
    let store = Arc::new(JsonHoldingsStore::new(&config.holdings_path));
    tracing::info!("Holdings file in use: {}", store.path().display());
    let session = MonitorSession::with_http_clients(&config.settings, store)?;
    Ok(Arc::new(session))
}
