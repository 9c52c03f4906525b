mod calibration;
mod control;
mod settings;
mod zone;

pub use calibration::*;
pub use control::*;
pub use settings::*;
pub use zone::*;

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::classify::classify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Air temperature in Celsius
    Temperature,
    /// Relative humidity percentage
    Humidity,
    /// CO2 concentration in PPM
    Co2,
    /// Light intensity in lux
    Light,
    /// Soil moisture percentage
    Moisture,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Co2,
        Metric::Light,
        Metric::Moisture,
    ];

    /// Metrics that get a rolling chart series.
    pub const CHARTED: [Metric; 4] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Co2,
        Metric::Light,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Co2 => "co2",
            Metric::Light => "light",
            Metric::Moisture => "moisture",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity | Metric::Moisture => "%",
            Metric::Co2 => "PPM",
            Metric::Light => "lux",
        }
    }

    /// Inclusive normal operating range used for status classification
    pub fn normal_range(&self) -> (f64, f64) {
        match self {
            Metric::Temperature => (22.0, 28.0),
            Metric::Humidity => (60.0, 80.0),
            Metric::Co2 => (600.0, 1200.0),
            Metric::Light => (3000.0, 8000.0),
            Metric::Moisture => (40.0, 70.0),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    Normal,
    Warning,
    Critical,
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingStatus::Normal => f.write_str("normal"),
            ReadingStatus::Warning => f.write_str("warning"),
            ReadingStatus::Critical => f.write_str("critical"),
        }
    }
}

/// A single timestamped observation.
///
/// The status is always derived from the value when the reading is built and
/// cannot be set on its own. Incoming readings are rebuilt from their value
/// when a [`Zone`] is decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    value: f64,
    unit: String,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    status: ReadingStatus,
}

impl SensorReading {
    pub fn new(metric: Metric, value: f64, timestamp: OffsetDateTime) -> Self {
        Self {
            value,
            unit: metric.unit().to_string(),
            timestamp,
            status: classify(value, metric.normal_range()),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    pub fn status(&self) -> ReadingStatus {
        self.status
    }
}
