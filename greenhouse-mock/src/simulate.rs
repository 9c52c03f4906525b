use std::collections::HashMap;

use greenhouse_api::{Metric, SensorReading, TankLevel, TankUnit, Zone};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use time::OffsetDateTime;

use crate::settings::ZoneProfile;

// Fraction of the distance back to the baseline covered on every step
const MEAN_REVERSION: f64 = 0.2;
// Step noise as a fraction of the metric spread
const STEP_DEVIATION: f64 = 0.1;

const TANK_CAPACITY_LITERS: f64 = 50.0;

/// Peak-to-peak variation allowed around a zone baseline.
fn spread(metric: Metric) -> f64 {
    match metric {
        Metric::Temperature => 4.0,
        Metric::Humidity => 20.0,
        Metric::Co2 => 400.0,
        Metric::Light => 2000.0,
        Metric::Moisture => 30.0,
    }
}

/// Physically plausible limits, applied after the walk.
fn limits(metric: Metric) -> (f64, f64) {
    match metric {
        Metric::Temperature => (15.0, 40.0),
        Metric::Humidity => (20.0, 95.0),
        Metric::Co2 => (300.0, 2000.0),
        Metric::Light => (1000.0, 12000.0),
        Metric::Moisture => (10.0, 90.0),
    }
}

fn round_for(metric: Metric, value: f64) -> f64 {
    match metric {
        Metric::Temperature => round_tenth(value),
        _ => value.round(),
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Walk bounds: the baseline band intersected with the physical limits.
fn walk_bounds(metric: Metric, baseline: f64) -> (f64, f64) {
    let half = spread(metric) / 2.0;
    let (floor, ceiling) = limits(metric);
    let low = (baseline - half).max(floor);
    let high = (baseline + half).min(ceiling);

    if low <= high { (low, high) } else { (floor, ceiling) }
}

/// Synthetic zone telemetry: a bounded, mean-reverting random walk per metric.
pub struct TelemetryGenerator {
    rng: StdRng,
    last_values: HashMap<(String, Metric), f64>,
}

impl TelemetryGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            rng,
            last_values: HashMap::new(),
        }
    }

    /// Produce the next snapshot of a zone.
    pub fn next_zone(&mut self, profile: &ZoneProfile, now: OffsetDateTime) -> Zone {
        Zone {
            id: profile.id.clone(),
            name: profile.name.clone(),
            temperature: self.next_reading(profile, Metric::Temperature, now),
            humidity: self.next_reading(profile, Metric::Humidity, now),
            co2: self.next_reading(profile, Metric::Co2, now),
            light: self.next_reading(profile, Metric::Light, now),
            moisture: self.next_reading(profile, Metric::Moisture, now),
            tanks: vec![self.next_tank(profile)],
        }
    }

    /// One snapshot of every profile, in profile order.
    pub fn snapshot(&mut self, profiles: &[ZoneProfile], now: OffsetDateTime) -> Vec<Zone> {
        profiles
            .iter()
            .map(|profile| self.next_zone(profile, now))
            .collect()
    }

    fn next_reading(
        &mut self,
        profile: &ZoneProfile,
        metric: Metric,
        now: OffsetDateTime,
    ) -> SensorReading {
        let baseline = profile.baselines.get(metric);
        let (low, high) = walk_bounds(metric, baseline);
        let key = (profile.id.clone(), metric);

        let raw = match self.last_values.get(&key) {
            Some(previous) => {
                let noise = Normal::new(0.0, spread(metric) * STEP_DEVIATION)
                    .map(|normal| normal.sample(&mut self.rng))
                    .unwrap_or(0.0);
                previous + (baseline - previous) * MEAN_REVERSION + noise
            }
            None => {
                let half = spread(metric) / 2.0;
                baseline + self.rng.random_range(-half..half)
            }
        };

        let value = round_for(metric, raw.clamp(low, high));
        self.last_values.insert(key, value);

        SensorReading::new(metric, value, now)
    }

    /// Level and percentage are drawn independently of each other.
    fn next_tank(&mut self, profile: &ZoneProfile) -> TankLevel {
        TankLevel {
            id: format!("tank-{}1", profile.id),
            name: profile.tank_name.clone(),
            current_level: round_tenth(self.rng.random_range(5.0..TANK_CAPACITY_LITERS)),
            max_capacity: TANK_CAPACITY_LITERS,
            unit: TankUnit::Liters,
            percentage: self.rng.random_range(10.0..=100.0_f64).round(),
        }
    }
}
