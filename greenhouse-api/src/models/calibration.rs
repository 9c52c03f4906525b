use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Payload of a `ppm_calibration` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PpmCalibration {
    /// Calibrated nutrient concentration in PPM
    pub value: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}
