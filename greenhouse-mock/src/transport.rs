use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use greenhouse_api::{
    ConnectionStatus, Message, MessageHandler, MessageType, StatusHandler, Transport,
    TransportError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use time::OffsetDateTime;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::settings::SimulationConfig;
use crate::simulate::TelemetryGenerator;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Link {
    status: ConnectionStatus,
    /// Bumped on every connect and disconnect; tasks from older epochs go quiet.
    epoch: u64,
    /// Whether the observer has been handed a status yet.
    reported: bool,
}

struct Shared {
    config: SimulationConfig,
    handlers: RwLock<HashMap<MessageType, MessageHandler>>,
    observer: RwLock<Option<StatusHandler>>,
    link: Mutex<Link>,
    /// Held from the epoch check until the handler returns, so nothing from an
    /// older epoch lands after the status that ended it.
    delivery: Mutex<()>,
    generator: Mutex<TelemetryGenerator>,
    rng: Mutex<StdRng>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Shared {
    fn is_current(&self, epoch: u64) -> bool {
        lock(&self.link).epoch == epoch
    }

    /// Start a new epoch and cancel everything scheduled by the previous ones.
    fn restart(&self) -> u64 {
        let epoch = {
            let mut link = lock(&self.link);
            link.epoch += 1;
            link.epoch
        };
        self.abort_tasks();

        epoch
    }

    fn abort_tasks(&self) {
        for task in lock(&self.tasks).drain(..) {
            task.abort();
        }
    }

    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = lock(&self.tasks);
        tasks.retain(|task| !task.is_finished());
        tasks.push(task);
    }

    fn set_status(&self, epoch: u64, status: ConnectionStatus) -> bool {
        let _delivery = lock(&self.delivery);
        {
            let mut link = lock(&self.link);
            if link.epoch != epoch {
                return false;
            }
            link.status = status;
            link.reported = true;
        }

        tracing::info!("Connection status: {}", status);
        self.notify(status);

        true
    }

    fn notify(&self, status: ConnectionStatus) {
        let observer = self
            .observer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(observer) = observer {
            observer(status);
        }
    }

    fn dispatch(&self, epoch: u64, message: Message) -> bool {
        let _delivery = lock(&self.delivery);
        if !self.is_current(epoch) {
            return false;
        }

        let handler = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&message.kind)
            .cloned();

        match handler {
            Some(handler) => {
                tracing::debug!("Receive: {} {:?}", message.kind, message.zone_id);
                handler(message);
            }
            None => tracing::debug!("No handler for {}, dropping", message.kind),
        }

        true
    }

    /// Emit one `sensor_data` message per zone, in configured order.
    fn emit_cycle(&self, epoch: u64) -> bool {
        let now = OffsetDateTime::now_utc();
        let zones = lock(&self.generator).snapshot(&self.config.zones, now);

        for zone in zones {
            match Message::sensor_data(&zone, now) {
                Ok(message) => {
                    if !self.dispatch(epoch, message) {
                        return false;
                    }
                }
                Err(e) => tracing::error!("Failed to encode zone {}: {}", zone.id, e),
            }
        }

        true
    }

    fn delay(&self, (min, max): (u64, u64)) -> Duration {
        let (low, high) = (min.min(max), min.max(max));
        Duration::from_millis(lock(&self.rng).random_range(low..=high))
    }

    fn roll(&self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            false
        } else if probability >= 1.0 {
            true
        } else {
            lock(&self.rng).random_bool(probability)
        }
    }
}

/// Drives one connection: connect delay, periodic emission and simulated
/// connection issues, restarting the connect sequence after a drop.
async fn run_session(shared: Arc<Shared>, epoch: u64) {
    let config = &shared.config;

    loop {
        sleep(shared.delay(config.connect_delay_ms)).await;
        if !shared.set_status(epoch, ConnectionStatus::Connected) {
            return;
        }
        if !shared.emit_cycle(epoch) {
            return;
        }

        loop {
            sleep(shared.delay(config.emit_interval_ms)).await;

            if !shared.roll(config.issue_probability) {
                if !shared.emit_cycle(epoch) {
                    return;
                }
                continue;
            }

            tracing::warn!("Simulating connection issue");
            if !shared.set_status(epoch, ConnectionStatus::Connecting) {
                return;
            }
            sleep(shared.delay(config.issue_duration_ms)).await;

            if shared.roll(config.recovery_probability) {
                if !shared.set_status(epoch, ConnectionStatus::Connected) {
                    return;
                }
                continue;
            }

            if !shared.set_status(epoch, ConnectionStatus::Disconnected) {
                return;
            }
            sleep(Duration::from_millis(config.reconnect_delay_ms)).await;
            if !shared.set_status(epoch, ConnectionStatus::Connecting) {
                return;
            }
            break;
        }
    }
}

/// In-process stand-in for a greenhouse link. Readings are fabricated on
/// timers and looped back through the registered handlers.
///
/// Running tasks hold on to the link, so call [`Transport::disconnect`]
/// before dropping the last handle. Handlers run while delivery is locked
/// and must not call `connect` or `disconnect` on the same transport.
#[derive(Clone)]
pub struct MockTransport {
    shared: Arc<Shared>,
}

impl MockTransport {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            // Offset so link timing and readings do not share a stream
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_os_rng(),
        };
        let generator = TelemetryGenerator::new(config.seed);

        Self {
            shared: Arc::new(Shared {
                config,
                handlers: RwLock::new(HashMap::new()),
                observer: RwLock::new(None),
                link: Mutex::new(Link {
                    status: ConnectionStatus::Disconnected,
                    epoch: 0,
                    reported: false,
                }),
                delivery: Mutex::new(()),
                generator: Mutex::new(generator),
                rng: Mutex::new(rng),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.shared.config
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        let runtime = Handle::try_current().map_err(|e| TransportError::Runtime(e.to_string()))?;

        let epoch = self.shared.restart();
        self.shared.set_status(epoch, ConnectionStatus::Connecting);
        self.shared
            .track(runtime.spawn(run_session(self.shared.clone(), epoch)));

        Ok(())
    }

    fn on_message(&self, kind: MessageType, handler: MessageHandler) {
        self.shared
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, handler);
    }

    fn on_connection_status_change(&self, handler: StatusHandler) {
        *self
            .shared
            .observer
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    fn send_message(&self, message: Message) -> Result<(), TransportError> {
        tracing::debug!("Send: {} {}", message.kind, message.data);

        if message.kind != MessageType::ControlUpdate {
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|e| TransportError::Runtime(e.to_string()))?;
        let epoch = lock(&self.shared.link).epoch;

        let mut echo = message;
        echo.timestamp = OffsetDateTime::now_utc();
        echo.zone_id = None;
        if let Value::Object(data) = &mut echo.data {
            data.entry("success").or_insert(Value::Bool(true));
        }

        let shared = self.shared.clone();
        let delay = Duration::from_millis(shared.config.ack_delay_ms);
        self.shared.track(runtime.spawn(async move {
            sleep(delay).await;
            shared.dispatch(epoch, echo);
        }));

        Ok(())
    }

    fn disconnect(&self) {
        let _delivery = lock(&self.shared.delivery);
        let changed = {
            let mut link = lock(&self.shared.link);
            link.epoch += 1;
            let previous = std::mem::replace(&mut link.status, ConnectionStatus::Disconnected);
            // The first disconnect is always reported, even before any connect
            let changed = previous != ConnectionStatus::Disconnected || !link.reported;
            link.reported = true;
            changed
        };
        self.shared.abort_tasks();

        if changed {
            tracing::info!("Connection status: {}", ConnectionStatus::Disconnected);
            self.shared.notify(ConnectionStatus::Disconnected);
        }
    }

    fn status(&self) -> ConnectionStatus {
        lock(&self.shared.link).status
    }
}
