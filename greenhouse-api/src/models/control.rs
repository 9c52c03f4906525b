use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlMode {
    On,
    Off,
    Auto,
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::On => f.write_str("ON"),
            ControlMode::Off => f.write_str("OFF"),
            ControlMode::Auto => f.write_str("AUTO"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlState {
    /// Equipment name
    pub name: String,
    /// Current mode
    pub state: ControlMode,
    /// Whether the control cycles through `AUTO`
    pub allow_auto: bool,
}

impl ControlState {
    pub fn new(name: &str, state: ControlMode, allow_auto: bool) -> Self {
        Self {
            name: name.to_string(),
            state,
            allow_auto,
        }
    }
}

/// Payload of a `control_update` message.
///
/// Outbound updates leave `success` empty; the acknowledgement echo carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlUpdate {
    /// Position of the control in the control list
    pub control_index: usize,
    /// Requested mode
    pub state: ControlMode,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}
