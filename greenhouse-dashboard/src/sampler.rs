use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime};

use crate::buffer::{DataPoint, TimeSeriesBuffer};
use crate::error::DashboardError;

const SECONDS_LABEL: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const MINUTES_LABEL: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

// Vertical padding added on each side of the chart, as a fraction of the value range
const AXIS_PADDING: f64 = 0.1;

/// Operator-selected chart lookback.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Window {
    #[serde(rename = "30s")]
    ThirtySeconds,
    #[serde(rename = "1m")]
    OneMinute,
    #[default]
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "12h")]
    TwelveHours,
    #[serde(rename = "24h")]
    TwentyFourHours,
}

impl Window {
    pub const ALL: [Window; 6] = [
        Window::ThirtySeconds,
        Window::OneMinute,
        Window::OneHour,
        Window::SixHours,
        Window::TwelveHours,
        Window::TwentyFourHours,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Window::ThirtySeconds => "30s",
            Window::OneMinute => "1m",
            Window::OneHour => "1h",
            Window::SixHours => "6h",
            Window::TwelveHours => "12h",
            Window::TwentyFourHours => "24h",
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Window::ThirtySeconds => Duration::seconds(30),
            Window::OneMinute => Duration::minutes(1),
            Window::OneHour => Duration::hours(1),
            Window::SixHours => Duration::hours(6),
            Window::TwelveHours => Duration::hours(12),
            Window::TwentyFourHours => Duration::hours(24),
        }
    }

    /// Maximum number of points drawn for this window
    pub fn point_budget(&self) -> usize {
        match self {
            Window::ThirtySeconds | Window::OneMinute => 20,
            Window::OneHour => 30,
            Window::SixHours => 40,
            Window::TwelveHours | Window::TwentyFourHours => 50,
        }
    }

    /// Axis label for a point, with seconds only on the short windows.
    pub fn format_label(&self, timestamp: OffsetDateTime) -> Result<String, time::error::Format> {
        match self {
            Window::ThirtySeconds | Window::OneMinute => timestamp.format(SECONDS_LABEL),
            _ => timestamp.format(MINUTES_LABEL),
        }
    }

    pub fn sample(&self, buffer: &TimeSeriesBuffer, now: OffsetDateTime) -> Vec<DataPoint> {
        sample(buffer, self.duration(), self.point_budget(), now)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Window {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Window::ALL
            .into_iter()
            .find(|window| window.as_str() == s)
            .ok_or_else(|| DashboardError::UnknownWindow(s.to_string()))
    }
}

/// Keep the points inside `window` ending at `now`, then decimate by index
/// stride until at most `point_budget` remain.
///
/// The stride is `ceil(n / point_budget)` starting at index 0, so gaps are
/// even in index, not in time. The result is never reordered or interpolated.
pub fn sample(
    buffer: &TimeSeriesBuffer,
    window: Duration,
    point_budget: usize,
    now: OffsetDateTime,
) -> Vec<DataPoint> {
    let cutoff = now - window;
    let filtered: Vec<DataPoint> = buffer
        .iter()
        .filter(|point| point.timestamp >= cutoff)
        .copied()
        .collect();

    if filtered.len() <= point_budget {
        return filtered;
    }
    if point_budget == 0 {
        return Vec::new();
    }

    let stride = filtered.len().div_ceil(point_budget);
    filtered.into_iter().step_by(stride).collect()
}

/// Vertical extent of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Padded min/max of a series. A flat series gets a nominal range of 1
    /// so scaling never divides by zero; an empty one has no axis at all.
    pub fn from_points(points: &[DataPoint]) -> Option<Self> {
        let first = points.first()?.value;
        let (low, high) = points
            .iter()
            .fold((first, first), |(low, high), point| {
                (low.min(point.value), high.max(point.value))
            });

        let mut range = high - low;
        if range == 0.0 {
            range = 1.0;
        }

        Some(Self {
            min: low - range * AXIS_PADDING,
            max: high + range * AXIS_PADDING,
        })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` on the axis, 0.0 at `min` and 1.0 at `max`.
    pub fn position(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }
}
