use greenhouse_api::{MessageError, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("No control at index {0}")]
    ControlIndex(usize),

    #[error("Invalid {category} range: min {min} must not exceed max {max}")]
    InvalidRange { category: String, min: f64, max: f64 },

    #[error("Invalid {category} value: {value}")]
    InvalidValue { category: String, value: String },

    #[error("Invalid schedule time: {0}, expected HH:MM")]
    InvalidSchedule(String),

    #[error("Unknown setting: {category}.{field}")]
    UnknownSetting { category: String, field: String },

    #[error("Unknown PPM preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown chart window: {0}")]
    UnknownWindow(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Message error: {0}")]
    Message(#[from] MessageError),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
