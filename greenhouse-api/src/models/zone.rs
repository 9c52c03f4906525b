use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{Metric, SensorReading};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ZoneRecord")]
pub struct Zone {
    /// Stable zone identifier
    pub id: String,
    /// Display name
    pub name: String,
    pub temperature: SensorReading,
    pub humidity: SensorReading,
    pub co2: SensorReading,
    pub light: SensorReading,
    pub moisture: SensorReading,
    /// Nutrient tanks attached to the zone, in display order
    pub tanks: Vec<TankLevel>,
}

impl Zone {
    pub fn reading(&self, metric: Metric) -> &SensorReading {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Humidity => &self.humidity,
            Metric::Co2 => &self.co2,
            Metric::Light => &self.light,
            Metric::Moisture => &self.moisture,
        }
    }
}

/// Reading as received. Any unit or status on the wire is ignored.
#[derive(Deserialize)]
struct ReadingRecord {
    value: f64,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

impl ReadingRecord {
    fn into_reading(self, metric: Metric) -> SensorReading {
        SensorReading::new(metric, self.value, self.timestamp)
    }
}

#[derive(Deserialize)]
struct ZoneRecord {
    id: String,
    name: String,
    temperature: ReadingRecord,
    humidity: ReadingRecord,
    co2: ReadingRecord,
    light: ReadingRecord,
    moisture: ReadingRecord,
    tanks: Vec<TankLevel>,
}

impl From<ZoneRecord> for Zone {
    fn from(record: ZoneRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            temperature: record.temperature.into_reading(Metric::Temperature),
            humidity: record.humidity.into_reading(Metric::Humidity),
            co2: record.co2.into_reading(Metric::Co2),
            light: record.light.into_reading(Metric::Light),
            moisture: record.moisture.into_reading(Metric::Moisture),
            tanks: record.tanks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankUnit {
    #[serde(rename = "L")]
    Liters,
    #[serde(rename = "gal")]
    Gallons,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TankLevel {
    pub id: String,
    pub name: String,
    /// Current fill, in `unit`
    pub current_level: f64,
    /// Tank capacity, in `unit`
    pub max_capacity: f64,
    pub unit: TankUnit,
    /// Fill percentage (0-100)
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReadingStatus;

    fn create_test_zone() -> Zone {
        let now = OffsetDateTime::UNIX_EPOCH;

        Zone {
            id: "zone-a".to_string(),
            name: "Zone A".to_string(),
            temperature: SensorReading::new(Metric::Temperature, 25.0, now),
            humidity: SensorReading::new(Metric::Humidity, 50.0, now),
            co2: SensorReading::new(Metric::Co2, 800.0, now),
            light: SensorReading::new(Metric::Light, 5000.0, now),
            moisture: SensorReading::new(Metric::Moisture, 55.0, now),
            tanks: Vec::new(),
        }
    }

    #[test]
    fn test_decoded_status_follows_value() {
        let mut value = serde_json::to_value(create_test_zone()).unwrap();
        value["temperature"]["status"] = "critical".into();
        value["temperature"]["unit"] = "°F".into();
        value["humidity"]["status"] = "normal".into();

        let zone: Zone = serde_json::from_value(value).unwrap();

        assert_eq!(zone.temperature.status(), ReadingStatus::Normal);
        assert_eq!(zone.temperature.unit(), "°C");
        assert_eq!(zone.humidity.status(), ReadingStatus::Warning);
    }

    #[test]
    fn test_zone_survives_wire() {
        let zone = create_test_zone();
        let text = serde_json::to_string(&zone).unwrap();

        assert_eq!(serde_json::from_str::<Zone>(&text).unwrap(), zone);
    }
}
