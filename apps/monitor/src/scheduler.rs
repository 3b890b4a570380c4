//! Refresh loop driving the monitoring session.

use std::sync::Arc;

use fundpulse_core::{MonitorSession, PortfolioValuation, ValuationMode};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

/// Refresh on every tick until the process is interrupted.
pub async fn run_refresh_loop(session: Arc<MonitorSession>, mode: ValuationMode, every: Duration) {
    info!("Monitoring in {} mode every {:?}", mode, every);
    let mut ticker = interval(every);
    // A slow refresh should not be followed by a burst of catch-up refreshes
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => run_refresh(&session, mode).await,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping monitor");
                break;
            }
        }
    }
}

async fn run_refresh(session: &MonitorSession, mode: ValuationMode) {
    match session.refresh(mode).await {
        Ok(valuation) => report(&valuation, session.series().len()),
        Err(e) => warn!("Refresh failed: {}", e),
    }
}

fn report(valuation: &PortfolioValuation, series_len: usize) {
    let snapshot = &valuation.snapshot;
    if valuation.positions.is_empty() {
        warn!("No holdings configured, add some to the holdings file");
        return;
    }

    info!(
        "[{}] total profit {} | total asset {} | {} points",
        snapshot.timestamp.with_timezone(&chrono::Local).format("%H:%M:%S"),
        snapshot.total_profit.round_dp(2),
        snapshot.total_asset.round_dp(2),
        series_len
    );
    for position in valuation.unavailable_positions() {
        warn!("{} ({}) unavailable", position.holding.code, position.holding.name);
    }
    for position in valuation.fallback_positions() {
        warn!(
            "{} ({}) shadow estimate fell back to 0.0: {}",
            position.holding.code,
            position.holding.name,
            position.fallback_reason.as_deref().unwrap_or_default()
        );
    }
}
