use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::error::MessageError;
use crate::models::{ControlUpdate, PpmCalibration, Settings, Zone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Full zone snapshot
    SensorData,
    /// Link state change
    ConnectionStatus,
    /// Control mode change or its acknowledgement
    ControlUpdate,
    /// Full threshold settings
    SettingsUpdate,
    /// Nutrient calibration result
    PpmCalibration,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::SensorData => "sensor_data",
            MessageType::ConnectionStatus => "connection_status",
            MessageType::ControlUpdate => "control_update",
            MessageType::SettingsUpdate => "settings_update",
            MessageType::PpmCalibration => "ppm_calibration",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => f.write_str("connected"),
            ConnectionStatus::Connecting => f.write_str("connecting"),
            ConnectionStatus::Disconnected => f.write_str("disconnected"),
        }
    }
}

/// Message envelope shared by every transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Payload discriminator
    #[serde(rename = "type")]
    pub kind: MessageType,
    /// Type specific payload
    pub data: Value,
    /// Envelope creation time
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Zone the payload belongs to, if any
    #[serde(rename = "zoneId", default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
}

impl Message {
    pub fn new<T: Serialize>(
        kind: MessageType,
        data: &T,
        timestamp: OffsetDateTime,
    ) -> Result<Self, MessageError> {
        Ok(Self {
            kind,
            data: serde_json::to_value(data)?,
            timestamp,
            zone_id: None,
        })
    }

    pub fn sensor_data(zone: &Zone, timestamp: OffsetDateTime) -> Result<Self, MessageError> {
        let mut message = Self::new(MessageType::SensorData, zone, timestamp)?;
        message.zone_id = Some(zone.id.clone());
        Ok(message)
    }

    pub fn connection_status(
        status: ConnectionStatus,
        timestamp: OffsetDateTime,
    ) -> Result<Self, MessageError> {
        Self::new(MessageType::ConnectionStatus, &status, timestamp)
    }

    pub fn control_update(update: &ControlUpdate) -> Result<Self, MessageError> {
        Self::new(MessageType::ControlUpdate, update, update.timestamp)
    }

    pub fn settings_update(
        settings: &Settings,
        timestamp: OffsetDateTime,
    ) -> Result<Self, MessageError> {
        Self::new(MessageType::SettingsUpdate, settings, timestamp)
    }

    pub fn ppm_calibration(calibration: &PpmCalibration) -> Result<Self, MessageError> {
        Self::new(MessageType::PpmCalibration, calibration, calibration.timestamp)
    }

    /// Decode the payload, checking the envelope type first.
    pub fn decode<T: DeserializeOwned>(&self, expected: MessageType) -> Result<T, MessageError> {
        if self.kind != expected {
            return Err(MessageError::UnexpectedType {
                expected,
                actual: self.kind,
            });
        }

        Ok(serde_json::from_value(self.data.clone())?)
    }

    /// Decode a `sensor_data` payload and make sure it agrees with the envelope zone.
    pub fn decode_zone(&self) -> Result<Zone, MessageError> {
        let zone: Zone = self.decode(MessageType::SensorData)?;

        match &self.zone_id {
            Some(zone_id) if *zone_id != zone.id => Err(MessageError::ZoneMismatch {
                envelope: zone_id.clone(),
                payload: zone.id,
            }),
            _ => Ok(zone),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
