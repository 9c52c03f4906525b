use std::sync::Arc;

use greenhouse_api::Transport;
use greenhouse_mock::MockTransport;
use rand::SeedableRng;
use rand::rngs::StdRng;
use time::OffsetDateTime;
use tokio::time::interval;

use crate::configs::Settings;
use crate::error::DashboardError;
use crate::session::Session;
use crate::store::{Action, DashboardState, Store, synthetic_history};

pub mod buffer;
pub mod calibrator;
pub mod configs;
pub mod control;
pub mod error;
pub mod report;
pub mod sampler;
pub mod session;
pub mod store;

/// Run the headless dashboard against the simulated greenhouse until Ctrl-C.
pub async fn run(settings: &Arc<Settings>) -> Result<(), DashboardError> {
    let config = &settings.dashboard;

    let mut rng = match settings.simulation.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let store = Store::new(DashboardState::new(
        config.history_capacity,
        config.chart_capacity,
    ));
    store.dispatch(Action::ReplaceHistory(synthetic_history(
        &config.history_seed,
        config.history_capacity,
        OffsetDateTime::now_utc(),
        &mut rng,
    )))?;

    let transport: Arc<dyn Transport> = Arc::new(MockTransport::new(settings.simulation.clone()));
    let session = Session::bind(store.clone(), transport, config.calibration_settle());

    session.connect().await?;

    let mut ticker = interval(config.report_interval());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let state = store.snapshot();
                let now = OffsetDateTime::now_utc();

                tracing::info!("{}", report::status_line(&state));
                for zone in &state.zones {
                    tracing::info!("{}", report::zone_summary(&state, zone, config.default_window, now));
                }
            },
            result = &mut shutdown => {
                if let Err(e) = result {
                    tracing::error!("Failed to listen for shutdown: {e}");
                }
                break;
            },
        }
    }

    tracing::info!("Shutting down");
    session.disconnect();

    Ok(())
}
