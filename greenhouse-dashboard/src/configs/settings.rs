use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use greenhouse_mock::SimulationConfig;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::sampler::Window;
use crate::store::HistorySeed;

/// Environment variable naming a config file that replaces the built-in one
pub const CONFIG_ENV: &str = "GREENHOUSE_CONFIG";

const DEFAULT_CONFIG: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../",
    "configs/default.toml"
));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub history_capacity: usize,
    pub chart_capacity: usize,
    /// Window used by the console report
    pub default_window: Window,
    pub report_interval_ms: u64,
    /// Time a calibration waits for the reading to settle
    pub calibration_settle_ms: u64,
    #[serde(default)]
    pub history_seed: HistorySeed,
}

impl Dashboard {
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    pub fn calibration_settle(&self) -> Duration {
        Duration::from_millis(self.calibration_settle_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub simulation: SimulationConfig,
    pub dashboard: Dashboard,
}

impl Settings {
    /// Load the file named by `GREENHOUSE_CONFIG`, or the built-in defaults.
    pub fn new() -> Result<Self, DashboardError> {
        match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path),
            Err(_) => Self::parse(DEFAULT_CONFIG),
        }
    }

    pub fn from_file(path: &str) -> Result<Self, DashboardError> {
        let path = Self::normalize_path(path)?;

        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(source: &str) -> Result<Self, DashboardError> {
        Ok(toml::from_str(source)?)
    }

    fn normalize_path(path: &str) -> io::Result<PathBuf> {
        let path = Path::new(path);

        Ok(if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir()?.join(path)
        })
    }
}
