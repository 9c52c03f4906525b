use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

pub const DEFAULT_PPM: f64 = 1000.0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PpmPreset {
    #[default]
    Lettuce,
    Tomatoes,
    Herbs,
    Custom,
}

impl PpmPreset {
    pub const ALL: [PpmPreset; 4] = [
        PpmPreset::Lettuce,
        PpmPreset::Tomatoes,
        PpmPreset::Herbs,
        PpmPreset::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PpmPreset::Lettuce => "LETTUCE",
            PpmPreset::Tomatoes => "TOMATOES",
            PpmPreset::Herbs => "HERBS",
            PpmPreset::Custom => "CUSTOM",
        }
    }

    /// Ideal PPM band, `None` for the unbounded custom preset.
    pub fn range(&self) -> Option<(f64, f64)> {
        match self {
            PpmPreset::Lettuce => Some((500.0, 1000.0)),
            PpmPreset::Tomatoes => Some((1000.0, 1500.0)),
            PpmPreset::Herbs => Some((700.0, 1200.0)),
            PpmPreset::Custom => None,
        }
    }

    pub fn next(&self) -> Self {
        let index = self.index();
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let index = self.index();
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        match self {
            PpmPreset::Lettuce => 0,
            PpmPreset::Tomatoes => 1,
            PpmPreset::Herbs => 2,
            PpmPreset::Custom => 3,
        }
    }
}

impl fmt::Display for PpmPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PpmPreset {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PpmPreset::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DashboardError::UnknownPreset(s.to_string()))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PpmStatus {
    Low,
    #[default]
    Ideal,
    High,
}

impl PpmStatus {
    pub fn assess(value: f64, preset: PpmPreset) -> Self {
        match preset.range() {
            Some((min, _)) if value < min => PpmStatus::Low,
            Some((_, max)) if value > max => PpmStatus::High,
            _ => PpmStatus::Ideal,
        }
    }
}

/// PPM calibrator sub-state held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibratorState {
    pub selected_preset: PpmPreset,
    pub ppm_value: f64,
    pub status: PpmStatus,
    /// A calibration is settling
    pub waiting: bool,
}

impl CalibratorState {
    pub fn with_preset(self, preset: PpmPreset) -> Self {
        Self {
            selected_preset: preset,
            status: PpmStatus::assess(self.ppm_value, preset),
            ..self
        }
    }

    pub fn with_value(self, ppm_value: f64) -> Self {
        Self {
            ppm_value,
            status: PpmStatus::assess(ppm_value, self.selected_preset),
            ..self
        }
    }
}

impl Default for CalibratorState {
    fn default() -> Self {
        Self {
            selected_preset: PpmPreset::default(),
            ppm_value: DEFAULT_PPM,
            status: PpmStatus::default(),
            waiting: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_wraps() {
        assert_eq!(PpmPreset::Custom.next(), PpmPreset::Lettuce);
        assert_eq!(PpmPreset::Lettuce.previous(), PpmPreset::Custom);

        let mut preset = PpmPreset::Herbs;
        for _ in 0..PpmPreset::ALL.len() {
            preset = preset.next();
        }
        assert_eq!(preset, PpmPreset::Herbs);
    }

    #[test]
    fn test_assess() {
        assert_eq!(PpmStatus::assess(400.0, PpmPreset::Lettuce), PpmStatus::Low);
        assert_eq!(PpmStatus::assess(1000.0, PpmPreset::Lettuce), PpmStatus::Ideal);
        assert_eq!(PpmStatus::assess(1001.0, PpmPreset::Lettuce), PpmStatus::High);
        assert_eq!(PpmStatus::assess(999.0, PpmPreset::Tomatoes), PpmStatus::Low);
        assert_eq!(PpmStatus::assess(5.0, PpmPreset::Custom), PpmStatus::Ideal);
    }

    #[test]
    fn test_state_recomputes_status() {
        let state = CalibratorState::default();
        assert_eq!(state.status, PpmStatus::Ideal);

        let state = state.with_value(1300.0);
        assert_eq!(state.status, PpmStatus::High);

        let state = state.with_preset(PpmPreset::Tomatoes);
        assert_eq!(state.status, PpmStatus::Ideal);
        assert_eq!(state.ppm_value, 1300.0);
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!("tomatoes".parse::<PpmPreset>().unwrap(), PpmPreset::Tomatoes);
        assert!(matches!(
            "basil".parse::<PpmPreset>(),
            Err(DashboardError::UnknownPreset(_))
        ));
        assert_eq!(
            serde_json::to_string(&PpmPreset::Herbs).unwrap(),
            "\"HERBS\""
        );
    }
}
