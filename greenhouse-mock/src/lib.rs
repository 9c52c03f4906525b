pub mod settings;
pub mod simulate;
pub mod transport;

pub use settings::{MetricBaselines, SimulationConfig, ZoneProfile};
pub use simulate::TelemetryGenerator;
pub use transport::MockTransport;
