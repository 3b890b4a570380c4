//! Rolling profit series for the live chart.

pub mod rolling;

pub use rolling::{RollingSeries, SeriesPoint};
