use std::collections::VecDeque;
use std::collections::vec_deque::Iter;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Capacity of the long-running per-metric history
pub const HISTORY_CAPACITY: usize = 300;

/// Capacity of the per-zone chart cache
pub const CHART_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub value: f64,
}

impl DataPoint {
    pub fn new(timestamp: OffsetDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Append-only series that evicts from the head once it outgrows its capacity.
///
/// Callers append in non-decreasing timestamp order; the buffer never sorts.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesBuffer {
    points: VecDeque<DataPoint>,
    capacity: usize,
}

impl TimeSeriesBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::new(),
            capacity,
        }
    }

    pub fn append(&mut self, point: DataPoint) {
        self.points.push_back(point);

        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Consuming form of [`append`](Self::append).
    pub fn appended(mut self, point: DataPoint) -> Self {
        self.append(point);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&DataPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> Iter<'_, DataPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<DataPoint> {
        self.points.iter().copied().collect()
    }
}

impl Extend<DataPoint> for TimeSeriesBuffer {
    fn extend<I: IntoIterator<Item = DataPoint>>(&mut self, iter: I) {
        for point in iter {
            self.append(point);
        }
    }
}
