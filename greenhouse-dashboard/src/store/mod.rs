mod action;
mod state;

use std::sync::Arc;

use tokio::sync::watch;

pub use action::{Action, Bound, ScheduleField, SettingUpdate, parse_schedule_time, reduce};
pub use state::{DashboardState, HistorySeed, MetricSeries, synthetic_history};

use crate::error::DashboardError;

/// Shared container around [`DashboardState`].
///
/// Every dispatch replaces the state as a whole. Subscribers are woken only
/// when an action actually changed something.
#[derive(Debug, Clone)]
pub struct Store {
    tx: Arc<watch::Sender<DashboardState>>,
}

impl Store {
    pub fn new(state: DashboardState) -> Self {
        let (tx, _) = watch::channel(state);

        Self { tx: Arc::new(tx) }
    }

    pub fn dispatch(&self, action: Action) -> Result<(), DashboardError> {
        let mut result = Ok(());

        self.tx.send_if_modified(|state| match reduce(state, action) {
            Ok(next) => {
                let changed = next != *state;
                *state = next;
                changed
            }
            Err(e) => {
                result = Err(e);
                false
            }
        });

        result
    }

    pub fn snapshot(&self) -> DashboardState {
        self.tx.borrow().clone()
    }

    /// Read the current state without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.tx.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DashboardState::default())
    }
}

#[cfg(test)]
mod tests {
    use greenhouse_api::{ConnectionStatus, ControlMode};

    use super::*;

    #[test]
    fn test_dispatch_replaces_state() {
        let store = Store::default();
        store.dispatch(Action::ToggleControl(1)).unwrap();

        assert_eq!(store.snapshot().controls[1].state, ControlMode::Auto);
    }

    #[test]
    fn test_rejected_action_keeps_state() {
        let store = Store::default();
        let before = store.snapshot();

        assert!(store.dispatch(Action::ToggleControl(42)).is_err());
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes_only() {
        let store = Store::default();
        let mut rx = store.subscribe();

        store
            .dispatch(Action::SetConnectionStatus(ConnectionStatus::Connecting))
            .unwrap();
        assert!(!rx.has_changed().unwrap());

        store
            .dispatch(Action::SetConnectionStatus(ConnectionStatus::Connected))
            .unwrap();
        assert!(rx.has_changed().unwrap());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().connection_status, ConnectionStatus::Connected);
    }
}
