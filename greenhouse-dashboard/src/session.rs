use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use greenhouse_api::{
    ConnectionStatus, ControlMode, ControlUpdate, Message, MessageError, MessageType,
    PpmCalibration, Settings, Transport, TransportError,
};
use time::OffsetDateTime;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::error::DashboardError;
use crate::store::{Action, SettingUpdate, Store};

/// Operator facing side of the dashboard: a store bound to a transport.
///
/// Incoming `sensor_data` and `control_update` messages and status changes
/// flow into the store. Operator actions mutate the store first and then
/// send the matching envelope.
pub struct Session {
    store: Store,
    transport: Arc<dyn Transport>,
    settle: Duration,
    calibration: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    pub fn bind(store: Store, transport: Arc<dyn Transport>, settle: Duration) -> Self {
        let sensor_store = store.clone();
        transport.on_message(
            MessageType::SensorData,
            Arc::new(move |message: Message| ingest_zone(&sensor_store, &message)),
        );

        let ack_store = store.clone();
        transport.on_message(
            MessageType::ControlUpdate,
            Arc::new(move |message: Message| acknowledge(&ack_store, &message)),
        );

        let status_store = store.clone();
        transport.on_connection_status_change(Arc::new(move |status: ConnectionStatus| {
            if let Err(e) = status_store.dispatch(Action::SetConnectionStatus(status)) {
                tracing::warn!("Failed to record connection status {status}: {e}");
            }
        }));

        Self {
            store,
            transport,
            settle,
            calibration: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Start the transport. An initialization fault leaves the dashboard
    /// showing `disconnected`.
    pub async fn connect(&self) -> Result<(), DashboardError> {
        if let Err(e) = self.transport.connect().await {
            tracing::error!("Failed to connect: {e}");
            self.store
                .dispatch(Action::SetConnectionStatus(ConnectionStatus::Disconnected))?;
            return Err(e.into());
        }

        Ok(())
    }

    pub fn disconnect(&self) {
        self.transport.disconnect();
    }

    /// Cycle a control and announce its new mode.
    ///
    /// The local change stands even if the send fails.
    pub fn toggle_control(&self, index: usize) -> Result<ControlMode, DashboardError> {
        self.store.dispatch(Action::ToggleControl(index))?;

        let state = self
            .store
            .with(|state| state.controls.get(index).map(|control| control.state))
            .ok_or(DashboardError::ControlIndex(index))?;

        let update = ControlUpdate {
            control_index: index,
            state,
            timestamp: OffsetDateTime::now_utc(),
            success: None,
        };
        if let Err(e) = self.send(Message::control_update(&update)) {
            tracing::warn!("Failed to send control update for control {index}: {e}");
        }

        Ok(state)
    }

    /// Edit one settings field. Nothing is sent until [`save_settings`](Self::save_settings).
    pub fn update_setting(&self, category: &str, field: &str, value: &str) -> Result<(), DashboardError> {
        let update = SettingUpdate::parse(category, field, value)?;

        self.store.dispatch(Action::UpdateSetting(update)).inspect_err(|e| {
            tracing::warn!("Rejected setting {category}.{field} = {value}: {e}");
        })
    }

    pub fn replace_settings(&self, settings: Settings) -> Result<(), DashboardError> {
        self.store.dispatch(Action::ReplaceSettings(settings))
    }

    /// Send the current settings as a whole.
    pub fn save_settings(&self) -> Result<(), DashboardError> {
        let settings = self.store.with(|state| state.settings.clone());

        self.send(Message::settings_update(&settings, OffsetDateTime::now_utc()))
    }

    pub fn next_preset(&self) -> Result<(), DashboardError> {
        self.store.dispatch(Action::NextPreset)
    }

    pub fn previous_preset(&self) -> Result<(), DashboardError> {
        self.store.dispatch(Action::PreviousPreset)
    }

    pub fn set_ppm_value(&self, value: f64) -> Result<(), DashboardError> {
        self.store.dispatch(Action::SetPpmValue(value))
    }

    /// Start a calibration with the current PPM value. Once the reading has
    /// settled the calibrator is released and a `ppm_calibration` message is
    /// sent.
    ///
    /// Returns `false` if a calibration is already settling.
    pub fn calibrate(&self) -> Result<bool, DashboardError> {
        let runtime = Handle::try_current().map_err(|e| TransportError::Runtime(e.to_string()))?;

        let mut slot = self.calibration.lock().unwrap_or_else(PoisonError::into_inner);
        let settling = slot.as_ref().is_some_and(|task| !task.is_finished());
        if settling || self.store.with(|state| state.calibrator.waiting) {
            return Ok(false);
        }

        let value = self.store.with(|state| state.calibrator.ppm_value);
        self.store.dispatch(Action::SetCalibrationWaiting(true))?;

        let store = self.store.clone();
        let transport = self.transport.clone();
        let settle = self.settle;
        *slot = Some(runtime.spawn(async move {
            sleep(settle).await;

            if let Err(e) = store.dispatch(Action::SetCalibrationWaiting(false)) {
                tracing::warn!("Failed to release calibrator: {e}");
            }

            let calibration = PpmCalibration {
                value,
                timestamp: OffsetDateTime::now_utc(),
            };
            let sent = Message::ppm_calibration(&calibration)
                .map_err(DashboardError::from)
                .and_then(|message| transport.send_message(message).map_err(DashboardError::from));
            match sent {
                Ok(()) => tracing::info!("Calibrated at {value} PPM"),
                Err(e) => tracing::warn!("Failed to send calibration: {e}"),
            }
        }));

        Ok(true)
    }

    fn send(&self, message: Result<Message, MessageError>) -> Result<(), DashboardError> {
        self.transport.send_message(message?)?;

        Ok(())
    }
}

impl Drop for Session {
    /// Abandon a settling calibration without sending it and release the
    /// calibrator.
    fn drop(&mut self) {
        let Some(task) = self
            .calibration
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            return;
        };

        if !task.is_finished() {
            task.abort();
            if let Err(e) = self.store.dispatch(Action::SetCalibrationWaiting(false)) {
                tracing::warn!("Failed to release calibrator: {e}");
            }
        }
    }
}

fn ingest_zone(store: &Store, message: &Message) {
    let zone = match message.decode_zone() {
        Ok(zone) => zone,
        Err(e) => {
            tracing::warn!("Dropped sensor data: {e}");
            return;
        }
    };

    let action = Action::IngestZone {
        zone,
        received_at: OffsetDateTime::now_utc(),
    };
    if let Err(e) = store.dispatch(action) {
        tracing::warn!("Failed to ingest sensor data: {e}");
    }
}

fn acknowledge(store: &Store, message: &Message) {
    let update: ControlUpdate = match message.decode(MessageType::ControlUpdate) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!("Dropped control update: {e}");
            return;
        }
    };

    if update.success == Some(false) {
        tracing::warn!(
            "Control {} was not acknowledged for {}",
            update.control_index,
            update.state
        );
    }
    if let Err(e) = store.dispatch(Action::ControlAcknowledged(update)) {
        tracing::warn!("Ignored control acknowledgement: {e}");
    }
}
