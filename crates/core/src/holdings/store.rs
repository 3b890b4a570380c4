//! Holdings persistence.
//!
//! The store is an ordered, append/clear-able list. The on-disk encoding is a plain JSON array
//! of `{code, name, shares}` objects.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};

use super::model::Holding;
use crate::errors::Result;

/// Storage abstraction for the portfolio.
pub trait HoldingsStore: Send + Sync {
    /// All holdings in insertion order.
    fn load(&self) -> Result<Vec<Holding>>;

    /// Append a holding and persist.
    fn append(&self, holding: Holding) -> Result<()>;

    /// Remove every holding and persist.
    fn clear(&self) -> Result<()>;
}

/// JSON file store.
///
/// A missing file is an empty portfolio. An unreadable or corrupt file is also treated as
/// empty (and logged), so a damaged file never blocks monitoring.
pub struct JsonHoldingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonHoldingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| {
            warn!("Holdings store mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn read(&self) -> Vec<Holding> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No holdings file at {}", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read holdings from {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&contents) {
            Ok(records) => records,
            Err(e) => {
                warn!("Ignoring corrupt holdings file {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<Holding>(record) {
                Ok(holding) => Some(holding),
                Err(e) => {
                    warn!(
                        "Skipping invalid holding #{} in {}: {}",
                        index,
                        self.path.display(),
                        e
                    );
                    None
                }
            })
            .collect()
    }

    fn write(&self, holdings: &[Holding]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(holdings)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HoldingsStore for JsonHoldingsStore {
    fn load(&self) -> Result<Vec<Holding>> {
        let _guard = self.lock();
        Ok(self.read())
    }

    fn append(&self, holding: Holding) -> Result<()> {
        let _guard = self.lock();
        let mut holdings = self.read();
        holdings.push(holding);
        self.write(&holdings)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock();
        self.write(&[])
    }
}

/// Non-persistent store, for ephemeral sessions and tests.
#[derive(Default)]
pub struct InMemoryHoldingsStore {
    holdings: Mutex<Vec<Holding>>,
}

impl InMemoryHoldingsStore {
    pub fn with_holdings(holdings: Vec<Holding>) -> Self {
        Self {
            holdings: Mutex::new(holdings),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Holding>> {
        self.holdings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HoldingsStore for InMemoryHoldingsStore {
    fn load(&self) -> Result<Vec<Holding>> {
        Ok(self.lock().clone())
    }

    fn append(&self, holding: Holding) -> Result<()> {
        self.lock().push(holding);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.lock().clear();
        Ok(())
    }
}
