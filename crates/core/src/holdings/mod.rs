//! Portfolio holdings and their persistence.

pub mod model;
pub mod store;

pub use model::Holding;
pub use store::{HoldingsStore, InMemoryHoldingsStore, JsonHoldingsStore};
