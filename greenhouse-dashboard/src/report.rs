use std::fmt::Write;

use greenhouse_api::{Metric, Zone};
use time::OffsetDateTime;

use crate::sampler::{AxisRange, Window};
use crate::store::DashboardState;

/// One line overview of the link and the data it delivered.
pub fn status_line(state: &DashboardState) -> String {
    let mut line = format!("{}, {} zone(s)", state.connection_status, state.zones.len());

    if let Some(last_updated) = state.last_updated {
        let label = Window::ThirtySeconds
            .format_label(last_updated)
            .unwrap_or_else(|_| last_updated.to_string());
        let _ = write!(line, ", last update {label}");
    }

    line
}

/// Latest readings of a zone followed by what its charts would draw for `window`.
pub fn zone_summary(state: &DashboardState, zone: &Zone, window: Window, now: OffsetDateTime) -> String {
    let mut summary = format!("{} ({}):", zone.name, zone.id);

    for metric in Metric::ALL {
        let reading = zone.reading(metric);
        let _ = write!(
            summary,
            " {metric} {} {} [{}]",
            reading.value(),
            reading.unit(),
            reading.status()
        );
    }

    for tank in &zone.tanks {
        let _ = write!(summary, "; {} {}%", tank.name, tank.percentage);
    }

    for metric in Metric::CHARTED {
        let Some(buffer) = state.chart(&zone.id, metric) else {
            continue;
        };

        let points = window.sample(buffer, now);
        let _ = write!(summary, "; {window} {metric} {} pts", points.len());

        if let Some(axis) = AxisRange::from_points(&points) {
            let _ = write!(summary, " axis {:.1}..{:.1}", axis.min, axis.max);
        }
        if let Some(label) = points
            .last()
            .and_then(|point| window.format_label(point.timestamp).ok())
        {
            let _ = write!(summary, " until {label}");
        }
    }

    summary
}
