use greenhouse_api::Metric;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBaselines {
    pub temperature: f64,
    pub humidity: f64,
    pub co2: f64,
    pub light: f64,
    pub moisture: f64,
}

impl MetricBaselines {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Co2 => self.co2,
            Metric::Light => self.light,
            Metric::Moisture => self.moisture,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneProfile {
    pub id: String,
    pub name: String,
    pub tank_name: String,
    pub baselines: MetricBaselines,
}

/// Timing and probability knobs of the simulated link. Durations are in milliseconds
/// and ranges are inclusive `[min, max]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Zones emitted on every cycle, in emission order
    pub zones: Vec<ZoneProfile>,
    pub connect_delay_ms: (u64, u64),
    pub emit_interval_ms: (u64, u64),
    /// Chance per cycle of a connection issue episode
    pub issue_probability: f64,
    pub issue_duration_ms: (u64, u64),
    /// Chance that an episode ends connected rather than disconnected
    pub recovery_probability: f64,
    pub reconnect_delay_ms: u64,
    pub ack_delay_ms: u64,
    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            zones: vec![
                ZoneProfile {
                    id: "zone-a".to_string(),
                    name: "Zone A".to_string(),
                    tank_name: "Nutrient A".to_string(),
                    baselines: MetricBaselines {
                        temperature: 24.0,
                        humidity: 65.0,
                        co2: 800.0,
                        light: 5000.0,
                        moisture: 55.0,
                    },
                },
                ZoneProfile {
                    id: "zone-b".to_string(),
                    name: "Zone B".to_string(),
                    tank_name: "Nutrient B".to_string(),
                    baselines: MetricBaselines {
                        temperature: 26.0,
                        humidity: 70.0,
                        co2: 900.0,
                        light: 6000.0,
                        moisture: 60.0,
                    },
                },
            ],
            connect_delay_ms: (1000, 3000),
            emit_interval_ms: (2000, 5000),
            issue_probability: 0.05,
            issue_duration_ms: (3000, 8000),
            recovery_probability: 0.8,
            reconnect_delay_ms: 5000,
            ack_delay_ms: 500,
            seed: None,
        }
    }
}
