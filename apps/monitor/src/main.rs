mod config;
mod main_lib;
mod scheduler;

use config::Config;
use main_lib::{build_session, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();
    let session = build_session(&config)?;

    let holdings = session.holdings()?;
    tracing::info!("Loaded {} holdings", holdings.len());

    scheduler::run_refresh_loop(session, config.mode, config.refresh_interval).await;
    Ok(())
}
