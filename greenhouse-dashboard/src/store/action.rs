use greenhouse_api::{ConnectionStatus, ControlUpdate, Metric, Settings, ThresholdRange, Zone};
use time::macros::format_description;
use time::{OffsetDateTime, Time};

use crate::buffer::DataPoint;
use crate::calibrator::PpmPreset;
use crate::control::toggle;
use crate::error::DashboardError;

use super::state::{DashboardState, MetricSeries};

/// Every way the dashboard state can change.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Upsert a zone snapshot by id and extend the chart series
    IngestZone {
        zone: Zone,
        received_at: OffsetDateTime,
    },
    /// Replace the zone list wholesale. Chart series are left alone.
    SetZones(Vec<Zone>),
    SetConnectionStatus(ConnectionStatus),
    ToggleControl(usize),
    /// Record an acknowledgement echo. Local control state is never rolled back.
    ControlAcknowledged(ControlUpdate),
    UpdateSetting(SettingUpdate),
    ReplaceSettings(Settings),
    ReplaceHistory(MetricSeries),
    SelectPreset(PpmPreset),
    NextPreset,
    PreviousPreset,
    SetPpmValue(f64),
    SetCalibrationWaiting(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleField {
    StartTime,
    EndTime,
}

/// A single field edit on the settings form.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingUpdate {
    Threshold { metric: Metric, bound: Bound, value: f64 },
    LightSchedule { field: ScheduleField, value: String },
}

impl SettingUpdate {
    /// Build an update from the `category`/`field` names used on the wire,
    /// e.g. `("co2", "max", "1500")` or `("light", "startTime", "07:30")`.
    pub fn parse(category: &str, field: &str, value: &str) -> Result<Self, DashboardError> {
        let unknown = || DashboardError::UnknownSetting {
            category: category.to_string(),
            field: field.to_string(),
        };

        let metric = match category {
            "temperature" => Metric::Temperature,
            "humidity" => Metric::Humidity,
            "co2" => Metric::Co2,
            "light" => {
                let field = match field {
                    "startTime" | "start_time" => ScheduleField::StartTime,
                    "endTime" | "end_time" => ScheduleField::EndTime,
                    _ => return Err(unknown()),
                };
                return Ok(SettingUpdate::LightSchedule {
                    field,
                    value: value.trim().to_string(),
                });
            }
            _ => return Err(unknown()),
        };

        let bound = match field {
            "min" => Bound::Min,
            "max" => Bound::Max,
            _ => return Err(unknown()),
        };
        let value = value
            .trim()
            .parse::<f64>()
            .map_err(|_| DashboardError::InvalidValue {
                category: category.to_string(),
                value: value.to_string(),
            })?;

        Ok(SettingUpdate::Threshold { metric, bound, value })
    }
}

/// Apply `action` to a copy of `state`.
///
/// Rejected actions leave the caller's state untouched.
pub fn reduce(state: &DashboardState, action: Action) -> Result<DashboardState, DashboardError> {
    let mut next = state.clone();

    match action {
        Action::IngestZone { zone, received_at } => {
            next.charts
                .entry(zone.id.clone())
                .or_insert_with(|| MetricSeries::new(state.chart_capacity))
                .append_zone(&zone);

            match next.zones.iter_mut().find(|current| current.id == zone.id) {
                Some(current) => *current = zone,
                None => next.zones.push(zone),
            }

            for metric in Metric::CHARTED {
                if let Some(mean) = next.zone_mean(metric) {
                    next.history.append(metric, DataPoint::new(received_at, mean));
                }
            }
            next.last_updated = Some(received_at);
        }
        Action::SetZones(zones) => next.zones = zones,
        Action::SetConnectionStatus(status) => next.connection_status = status,
        Action::ToggleControl(index) => {
            let control = next
                .controls
                .get_mut(index)
                .ok_or(DashboardError::ControlIndex(index))?;
            *control = toggle(control);
        }
        Action::ControlAcknowledged(update) => {
            if update.control_index >= next.controls.len() {
                return Err(DashboardError::ControlIndex(update.control_index));
            }
            next.last_control_ack = Some(update);
        }
        Action::UpdateSetting(update) => apply_setting(&mut next.settings, update)?,
        Action::ReplaceSettings(settings) => {
            validate_settings(&settings)?;
            next.settings = settings;
        }
        Action::ReplaceHistory(history) => next.history = history,
        Action::SelectPreset(preset) => next.calibrator = next.calibrator.with_preset(preset),
        Action::NextPreset => {
            let preset = next.calibrator.selected_preset.next();
            next.calibrator = next.calibrator.with_preset(preset);
        }
        Action::PreviousPreset => {
            let preset = next.calibrator.selected_preset.previous();
            next.calibrator = next.calibrator.with_preset(preset);
        }
        Action::SetPpmValue(value) => {
            if !value.is_finite() || value < 0.0 {
                return Err(DashboardError::InvalidValue {
                    category: "ppm".to_string(),
                    value: value.to_string(),
                });
            }
            next.calibrator = next.calibrator.with_value(value);
        }
        Action::SetCalibrationWaiting(waiting) => next.calibrator.waiting = waiting,
    }

    Ok(next)
}

fn threshold_mut(settings: &mut Settings, metric: Metric) -> Option<&mut ThresholdRange> {
    match metric {
        Metric::Temperature => Some(&mut settings.temperature),
        Metric::Humidity => Some(&mut settings.humidity),
        Metric::Co2 => Some(&mut settings.co2),
        Metric::Light | Metric::Moisture => None,
    }
}

fn apply_setting(settings: &mut Settings, update: SettingUpdate) -> Result<(), DashboardError> {
    match update {
        SettingUpdate::Threshold { metric, bound, value } => {
            let range = threshold_mut(settings, metric).ok_or_else(|| {
                DashboardError::UnknownSetting {
                    category: metric.to_string(),
                    field: match bound {
                        Bound::Min => "min".to_string(),
                        Bound::Max => "max".to_string(),
                    },
                }
            })?;
            let mut candidate = *range;
            match bound {
                Bound::Min => candidate.min = value,
                Bound::Max => candidate.max = value,
            }
            validate_range(metric, &candidate)?;
            *range = candidate;
        }
        SettingUpdate::LightSchedule { field, value } => {
            parse_schedule_time(&value)?;
            match field {
                ScheduleField::StartTime => settings.light.start_time = value,
                ScheduleField::EndTime => settings.light.end_time = value,
            }
        }
    }

    Ok(())
}

fn validate_range(metric: Metric, range: &ThresholdRange) -> Result<(), DashboardError> {
    for value in [range.min, range.max] {
        if !value.is_finite() {
            return Err(DashboardError::InvalidValue {
                category: metric.to_string(),
                value: value.to_string(),
            });
        }
    }

    if range.min > range.max {
        return Err(DashboardError::InvalidRange {
            category: metric.to_string(),
            min: range.min,
            max: range.max,
        });
    }

    Ok(())
}

fn validate_settings(settings: &Settings) -> Result<(), DashboardError> {
    validate_range(Metric::Temperature, &settings.temperature)?;
    validate_range(Metric::Humidity, &settings.humidity)?;
    validate_range(Metric::Co2, &settings.co2)?;
    parse_schedule_time(&settings.light.start_time)?;
    parse_schedule_time(&settings.light.end_time)?;

    Ok(())
}

/// Parse a 24 hour `HH:MM` time.
pub fn parse_schedule_time(value: &str) -> Result<Time, DashboardError> {
    Time::parse(value, format_description!("[hour]:[minute]"))
        .map_err(|_| DashboardError::InvalidSchedule(value.to_string()))
}
