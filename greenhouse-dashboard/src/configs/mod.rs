mod settings;

pub use settings::{Dashboard, Logger, Settings};
