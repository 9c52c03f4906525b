use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRange {
    pub min: f64,
    pub max: f64,
}

impl ThresholdRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightSchedule {
    /// Lights on, `HH:MM`
    pub start_time: String,
    /// Lights off, `HH:MM`
    pub end_time: String,
}

/// Operator thresholds, sent whole in `settings_update` messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub temperature: ThresholdRange,
    pub humidity: ThresholdRange,
    pub co2: ThresholdRange,
    pub light: LightSchedule,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temperature: ThresholdRange::new(20.0, 30.0),
            humidity: ThresholdRange::new(60.0, 80.0),
            co2: ThresholdRange::new(600.0, 1200.0),
            light: LightSchedule {
                start_time: "06:00".to_string(),
                end_time: "18:00".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_wire_shape() {
        let value = serde_json::to_value(Settings::default()).unwrap();

        assert_eq!(value["temperature"]["min"], 20.0);
        assert_eq!(value["co2"]["max"], 1200.0);
        assert_eq!(value["light"]["startTime"], "06:00");
        assert_eq!(value["light"]["endTime"], "18:00");
    }
}
