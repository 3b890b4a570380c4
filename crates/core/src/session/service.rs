//! Monitor Session - one continuous monitoring session
//!
//! Owns everything that lives for the duration of a session: the estimate cache, the
//! rolling profit series and the holdings store. Callers hold it behind an `Arc` and drive
//! [`MonitorSession::refresh`] from their own timer.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};
use rust_decimal::Decimal;

use fundpulse_market_data::{
    BatchQuoteClient, ChangeQuoteSource, FundValuationClient, HoldingsDisclosureClient,
    HoldingsDisclosureSource, ValuationSource,
};

use crate::cache::{CacheTtls, EstimateCache};
use crate::errors::Result;
use crate::estimates::{FundEstimator, OfficialEstimator, ShadowEstimator};
use crate::holdings::{Holding, HoldingsStore};
use crate::series::{RollingSeries, SeriesPoint};
use crate::settings::SessionSettings;
use crate::valuation::{PortfolioAggregator, PortfolioValuation, ValuationMode};

pub struct MonitorSession {
    aggregator: PortfolioAggregator,
    cache: Arc<EstimateCache>,
    store: Arc<dyn HoldingsStore>,
    series: Mutex<SeriesState>,
}

/// Series plus a counter bumped on every reset. A refresh only records its point if no
/// reset happened while it was valuing.
struct SeriesState {
    points: RollingSeries,
    generation: u64,
}

impl SeriesState {
    fn reset(&mut self) {
        self.points.reset();
        self.generation = self.generation.wrapping_add(1);
    }
}

impl MonitorSession {
    /// Session with caller-supplied estimators.
    pub fn new(
        settings: &SessionSettings,
        store: Arc<dyn HoldingsStore>,
        official: Arc<dyn FundEstimator>,
        shadow: Arc<dyn FundEstimator>,
    ) -> Self {
        let cache = Arc::new(EstimateCache::new(CacheTtls {
            official: settings.official_ttl,
            shadow: settings.shadow_ttl,
        }));
        let aggregator = PortfolioAggregator::new(
            cache.clone(),
            official,
            shadow,
            settings.max_concurrency,
            settings.estimate_timeout,
        );

        Self {
            aggregator,
            cache,
            store,
            series: Mutex::new(SeriesState {
                points: RollingSeries::new(settings.series_capacity),
                generation: 0,
            }),
        }
    }

    /// Session wired to the given upstream sources.
    pub fn with_sources(
        settings: &SessionSettings,
        store: Arc<dyn HoldingsStore>,
        valuations: Arc<dyn ValuationSource>,
        disclosures: Arc<dyn HoldingsDisclosureSource>,
        quotes: Arc<dyn ChangeQuoteSource>,
    ) -> Self {
        let official = Arc::new(OfficialEstimator::new(valuations));
        let shadow = Arc::new(
            ShadowEstimator::new(disclosures, quotes)
                .with_dampening(settings.dampening)
                .with_top_holdings(settings.top_holdings),
        );
        Self::new(settings, store, official, shadow)
    }

    /// Session wired to the production HTTP clients.
    pub fn with_http_clients(
        settings: &SessionSettings,
        store: Arc<dyn HoldingsStore>,
    ) -> Result<Self> {
        let timeout = settings.request_timeout;
        Ok(Self::with_sources(
            settings,
            store,
            Arc::new(FundValuationClient::new(timeout)?),
            Arc::new(HoldingsDisclosureClient::new(timeout)?),
            Arc::new(BatchQuoteClient::new(timeout)?),
        ))
    }

    fn lock_series(&self) -> MutexGuard<'_, SeriesState> {
        self.series.lock().unwrap_or_else(|poisoned| {
            warn!("Series mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Value the stored portfolio and append the total to the series.
    pub async fn refresh(&self, mode: ValuationMode) -> Result<PortfolioValuation> {
        let generation = self.lock_series().generation;
        let holdings = self.store.load()?;
        Ok(self.value_and_record(&holdings, mode, generation).await)
    }

    /// Value `holdings` and append the total to the series.
    pub async fn refresh_portfolio(
        &self,
        holdings: &[Holding],
        mode: ValuationMode,
    ) -> PortfolioValuation {
        let generation = self.lock_series().generation;
        self.value_and_record(holdings, mode, generation).await
    }

    async fn value_and_record(
        &self,
        holdings: &[Holding],
        mode: ValuationMode,
        generation: u64,
    ) -> PortfolioValuation {
        let valuation = self.aggregator.value_portfolio(holdings, mode).await;

        let mut series = self.lock_series();
        if series.generation == generation {
            series.points.push(SeriesPoint {
                timestamp: valuation.snapshot.timestamp,
                total_profit: valuation.snapshot.total_profit,
            });
        } else {
            debug!("Series was reset during refresh, dropping its point");
        }
        valuation
    }

    /// Series points, oldest first.
    pub fn series(&self) -> Vec<SeriesPoint> {
        self.lock_series().points.points()
    }

    pub fn reset_series(&self) {
        self.lock_series().reset();
    }

    pub fn holdings(&self) -> Result<Vec<Holding>> {
        self.store.load()
    }

    /// Validate and persist a new holding. The series restarts since the portfolio changed.
    pub fn add_holding(&self, code: &str, name: &str, shares: Decimal) -> Result<Holding> {
        let holding = Holding::new(code, name, shares)?;
        self.store.append(holding.clone())?;
        self.reset_series();
        info!("Added holding {} ({}) with {} shares", holding.code, holding.name, holding.shares);
        Ok(holding)
    }

    /// Remove every holding. The series restarts as well.
    pub fn clear_holdings(&self) -> Result<()> {
        self.store.clear()?;
        self.reset_series();
        info!("Cleared all holdings");
        Ok(())
    }

    pub fn cache(&self) -> &EstimateCache {
        &self.cache
    }
}
