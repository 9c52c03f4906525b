use std::sync::Arc;
use std::time::Duration;

use greenhouse_api::{
    ConnectionStatus, ControlMode, ControlUpdate, Message, MessageType, Metric, PpmCalibration,
    SensorReading, Settings, ThresholdRange, Zone,
};
use greenhouse_dashboard::error::DashboardError;
use greenhouse_dashboard::session::Session;
use greenhouse_dashboard::store::Store;
use time::OffsetDateTime;
use tokio::time::sleep;

mod common;
use common::recording_transport::RecordingTransport;

const SETTLE: Duration = Duration::from_secs(10);

fn create_test_zone(id: &str, temperature: f64) -> Zone {
    let now = OffsetDateTime::now_utc();

    Zone {
        id: id.to_string(),
        name: format!("Zone {id}"),
        temperature: SensorReading::new(Metric::Temperature, temperature, now),
        humidity: SensorReading::new(Metric::Humidity, 65.0, now),
        co2: SensorReading::new(Metric::Co2, 850.0, now),
        light: SensorReading::new(Metric::Light, 5200.0, now),
        moisture: SensorReading::new(Metric::Moisture, 52.0, now),
        tanks: Vec::new(),
    }
}

fn bind(transport: &Arc<RecordingTransport>) -> Session {
    Session::bind(Store::default(), transport.clone(), SETTLE)
}

#[test]
fn test_sensor_data_reaches_store() {
    let transport = Arc::new(RecordingTransport::new());
    let session = bind(&transport);

    let zone = create_test_zone("zone-a", 24.0);
    transport.deliver(Message::sensor_data(&zone, OffsetDateTime::now_utc()).unwrap());

    let state = session.store().snapshot();
    assert_eq!(state.zones.len(), 1);
    assert_eq!(state.zones[0].id, zone.id);
    assert_eq!(state.zones[0].temperature.value(), 24.0);
    assert!(state.last_updated.is_some());
    assert_eq!(state.chart("zone-a", Metric::Co2).unwrap().len(), 1);
    assert_eq!(state.history.get(Metric::Light).unwrap().len(), 1);
}

#[test]
fn test_mismatched_zone_is_dropped() {
    let transport = Arc::new(RecordingTransport::new());
    let session = bind(&transport);

    let mut message =
        Message::sensor_data(&create_test_zone("zone-a", 24.0), OffsetDateTime::now_utc()).unwrap();
    message.zone_id = Some("zone-x".to_string());
    transport.deliver(message);

    assert!(session.store().snapshot().zones.is_empty());
}

#[test]
fn test_status_changes_reach_store() {
    let transport = Arc::new(RecordingTransport::new());
    let session = bind(&transport);
    assert_eq!(session.store().snapshot().connection_status, ConnectionStatus::Connecting);

    transport.report(ConnectionStatus::Connected);
    assert_eq!(session.store().snapshot().connection_status, ConnectionStatus::Connected);

    session.disconnect();
    assert_eq!(session.store().snapshot().connection_status, ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_connect_failure_shows_disconnected() {
    let transport = Arc::new(RecordingTransport::failing_connect());
    let session = bind(&transport);

    let result = session.connect().await;

    assert!(matches!(result, Err(DashboardError::Transport(_))));
    assert_eq!(session.store().snapshot().connection_status, ConnectionStatus::Disconnected);
}

#[test]
fn test_toggle_sends_control_update() {
    let transport = Arc::new(RecordingTransport::new());
    let session = bind(&transport);

    assert_eq!(session.toggle_control(1).unwrap(), ControlMode::Auto);

    let sent = transport.sent_of(MessageType::ControlUpdate);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].data["controlIndex"], 1);
    assert_eq!(sent[0].data["state"], "AUTO");
    assert!(sent[0].data.get("success").is_none());
}

#[test]
fn test_toggle_survives_send_failure() {
    let transport = Arc::new(RecordingTransport::failing_send());
    let session = bind(&transport);

    assert_eq!(session.toggle_control(2).unwrap(), ControlMode::On);
    assert_eq!(session.store().snapshot().controls[2].state, ControlMode::On);
}

#[test]
fn test_toggle_unknown_control() {
    let transport = Arc::new(RecordingTransport::new());
    let session = bind(&transport);

    assert!(matches!(
        session.toggle_control(4),
        Err(DashboardError::ControlIndex(4))
    ));
    assert!(transport.sent().is_empty());
}

#[test]
fn test_failed_acknowledgement_keeps_local_state() {
    let transport = Arc::new(RecordingTransport::new());
    let session = bind(&transport);
    session.toggle_control(0).unwrap();

    let ack = ControlUpdate {
        control_index: 0,
        state: ControlMode::Off,
        timestamp: OffsetDateTime::now_utc(),
        success: Some(false),
    };
    transport.deliver(Message::control_update(&ack).unwrap());

    let state = session.store().snapshot();
    assert_eq!(state.controls[0].state, ControlMode::Off);

    let recorded = state.last_control_ack.unwrap();
    assert_eq!(recorded.control_index, 0);
    assert_eq!(recorded.success, Some(false));
}

#[test]
fn test_update_and_save_settings() {
    let transport = Arc::new(RecordingTransport::new());
    let session = bind(&transport);

    session.update_setting("co2", "max", "1500").unwrap();
    session.update_setting("light", "endTime", "20:15").unwrap();
    assert!(matches!(
        session.update_setting("temperature", "min", "40"),
        Err(DashboardError::InvalidRange { .. })
    ));
    assert!(transport.sent().is_empty());

    session.save_settings().unwrap();

    let sent = transport.sent_of(MessageType::SettingsUpdate);
    assert_eq!(sent.len(), 1);
    let settings: Settings = sent[0].decode(MessageType::SettingsUpdate).unwrap();
    assert_eq!(settings.co2, ThresholdRange::new(600.0, 1500.0));
    assert_eq!(settings.temperature, ThresholdRange::new(20.0, 30.0));
    assert_eq!(settings.light.end_time, "20:15");
}

#[test]
fn test_replace_settings_all_or_nothing() {
    let transport = Arc::new(RecordingTransport::new());
    let session = bind(&transport);

    let settings = Settings {
        humidity: ThresholdRange::new(55.0, 85.0),
        ..Settings::default()
    };
    session.replace_settings(settings.clone()).unwrap();
    assert_eq!(session.store().snapshot().settings, settings);

    let inverted = Settings {
        humidity: ThresholdRange::new(50.0, 90.0),
        co2: ThresholdRange::new(1500.0, 400.0),
        ..settings.clone()
    };
    assert!(matches!(
        session.replace_settings(inverted),
        Err(DashboardError::InvalidRange { .. })
    ));
    assert_eq!(session.store().snapshot().settings, settings);
    assert!(transport.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_calibrate_waits_then_sends() {
    let transport = Arc::new(RecordingTransport::new());
    let session = bind(&transport);
    session.set_ppm_value(1200.0).unwrap();

    assert!(session.calibrate().unwrap());
    assert!(session.store().snapshot().calibrator.waiting);
    assert!(!session.calibrate().unwrap());

    sleep(Duration::from_secs(9)).await;
    assert!(session.store().snapshot().calibrator.waiting);
    assert!(transport.sent_of(MessageType::PpmCalibration).is_empty());

    // Value changes while settling do not affect the calibration in flight
    session.set_ppm_value(700.0).unwrap();

    sleep(Duration::from_secs(2)).await;
    assert!(!session.store().snapshot().calibrator.waiting);

    let sent = transport.sent_of(MessageType::PpmCalibration);
    assert_eq!(sent.len(), 1);
    let calibration: PpmCalibration = sent[0].decode(MessageType::PpmCalibration).unwrap();
    assert_eq!(calibration.value, 1200.0);

    assert!(session.calibrate().unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_session_cancels_calibration() {
    let transport = Arc::new(RecordingTransport::new());
    let session = bind(&transport);
    let store = session.store().clone();

    assert!(session.calibrate().unwrap());
    drop(session);

    assert!(!store.snapshot().calibrator.waiting);

    sleep(Duration::from_secs(15)).await;
    assert!(transport.sent().is_empty());
    assert!(!store.snapshot().calibrator.waiting);
}

#[test]
fn test_calibrate_requires_runtime() {
    let transport = Arc::new(RecordingTransport::new());
    let session = bind(&transport);

    assert!(matches!(
        session.calibrate(),
        Err(DashboardError::Transport(_))
    ));
    assert!(!session.store().snapshot().calibrator.waiting);
}
