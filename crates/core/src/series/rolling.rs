use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::settings::DEFAULT_SERIES_CAPACITY;

/// Total profit observed at one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub total_profit: Decimal,
}

/// Bounded FIFO of series points, oldest first.
///
/// Once `capacity` is exceeded the oldest point is dropped. Only [`reset`](Self::reset)
/// empties it.
#[derive(Debug, Clone)]
pub struct RollingSeries {
    points: VecDeque<SeriesPoint>,
    capacity: usize,
}

impl RollingSeries {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: SeriesPoint) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn reset(&mut self) {
        self.points.clear();
    }

    /// Points in insertion order.
    pub fn points(&self) -> Vec<SeriesPoint> {
        self.points.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RollingSeries {
    fn default() -> Self {
        Self::new(DEFAULT_SERIES_CAPACITY)
    }
}
