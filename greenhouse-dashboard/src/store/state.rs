use std::collections::BTreeMap;

use greenhouse_api::{ConnectionStatus, ControlState, ControlUpdate, Metric, Settings, Zone};
use rand::Rng;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::buffer::{CHART_CAPACITY, DataPoint, HISTORY_CAPACITY, TimeSeriesBuffer};
use crate::calibrator::CalibratorState;
use crate::control::default_controls;

const SEED_POINTS: i32 = 50;
const SEED_SPAN: Duration = Duration::hours(24);
// Peak-to-peak noise of the seeded history, relative to its center value
const SEED_VARIATION: f64 = 0.1;

/// One buffer per charted metric, all sharing a capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    series: BTreeMap<Metric, TimeSeriesBuffer>,
}

impl MetricSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            series: Metric::CHARTED
                .into_iter()
                .map(|metric| (metric, TimeSeriesBuffer::new(capacity)))
                .collect(),
        }
    }

    pub fn get(&self, metric: Metric) -> Option<&TimeSeriesBuffer> {
        self.series.get(&metric)
    }

    /// Append to the series of `metric`. Metrics that are not charted are ignored.
    pub fn append(&mut self, metric: Metric, point: DataPoint) {
        if let Some(buffer) = self.series.get_mut(&metric) {
            buffer.append(point);
        }
    }

    /// Append the value each charted metric takes in `zone`.
    pub fn append_zone(&mut self, zone: &Zone) {
        for metric in Metric::CHARTED {
            let reading = zone.reading(metric);
            self.append(metric, DataPoint::new(reading.timestamp(), reading.value()));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &TimeSeriesBuffer)> {
        self.series.iter().map(|(metric, buffer)| (*metric, buffer))
    }
}

/// Everything the dashboard shows, replaced as a whole on every action.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    /// Zones in order of first arrival
    pub zones: Vec<Zone>,
    pub connection_status: ConnectionStatus,
    /// Time the last `sensor_data` message was ingested
    pub last_updated: Option<OffsetDateTime>,
    pub settings: Settings,
    pub controls: Vec<ControlState>,
    /// Cross-zone mean of each charted metric
    pub history: MetricSeries,
    /// Per-zone chart cache keyed by zone id
    pub charts: BTreeMap<String, MetricSeries>,
    pub calibrator: CalibratorState,
    /// Most recent control acknowledgement
    pub last_control_ack: Option<ControlUpdate>,
    pub chart_capacity: usize,
}

impl DashboardState {
    pub fn new(history_capacity: usize, chart_capacity: usize) -> Self {
        Self {
            zones: Vec::new(),
            connection_status: ConnectionStatus::Connecting,
            last_updated: None,
            settings: Settings::default(),
            controls: default_controls(),
            history: MetricSeries::new(history_capacity),
            charts: BTreeMap::new(),
            calibrator: CalibratorState::default(),
            last_control_ack: None,
            chart_capacity,
        }
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    pub fn chart(&self, zone_id: &str, metric: Metric) -> Option<&TimeSeriesBuffer> {
        self.charts.get(zone_id)?.get(metric)
    }

    /// Mean of `metric` over every zone currently known.
    pub fn zone_mean(&self, metric: Metric) -> Option<f64> {
        if self.zones.is_empty() {
            return None;
        }

        let total: f64 = self
            .zones
            .iter()
            .map(|zone| zone.reading(metric).value())
            .sum();
        Some(total / self.zones.len() as f64)
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY, CHART_CAPACITY)
    }
}

/// Center values the history is seeded around before live data arrives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySeed {
    pub temperature: f64,
    pub humidity: f64,
    pub co2: f64,
    pub light: f64,
}

impl HistorySeed {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => Some(self.temperature),
            Metric::Humidity => Some(self.humidity),
            Metric::Co2 => Some(self.co2),
            Metric::Light => Some(self.light),
            Metric::Moisture => None,
        }
    }
}

impl Default for HistorySeed {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            humidity: 70.0,
            co2: 800.0,
            light: 1000.0,
        }
    }
}

/// Fifty points spread evenly over the day before `now`, the last one at `now`.
pub fn synthetic_history<R: Rng>(
    seed: &HistorySeed,
    capacity: usize,
    now: OffsetDateTime,
    rng: &mut R,
) -> MetricSeries {
    let interval = SEED_SPAN / SEED_POINTS;
    let mut history = MetricSeries::new(capacity);

    for metric in Metric::CHARTED {
        let Some(center) = seed.get(metric) else {
            continue;
        };

        for i in (0..SEED_POINTS).rev() {
            let variation = (rng.random::<f64>() - 0.5) * center * SEED_VARIATION;
            let value = ((center + variation).max(0.0) * 100.0).round() / 100.0;
            history.append(metric, DataPoint::new(now - interval * i, value));
        }
    }

    history
}
