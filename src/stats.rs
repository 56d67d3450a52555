//! Summary statistics shown on the dashboard's stats cards

use serde::Serialize;

use crate::models::TimeSeriesPoint;

/// Number of most recent samples compared against the window before them
pub const TREND_WINDOW: usize = 6;
/// Trends smaller than this (absolute) are reported as stable
pub const STABLE_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

impl TrendDirection {
    #[must_use]
    pub fn from_delta(delta: f64) -> Self {
        if delta.abs() < STABLE_THRESHOLD {
            Self::Stable
        } else if delta > 0.0 {
            Self::Rising
        } else {
            Self::Falling
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PollutantStats {
    pub current: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Mean of the last window minus mean of the window before it
    pub trend: f64,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub pm25: PollutantStats,
    pub no2: PollutantStats,
}

impl SeriesStats {
    /// `None` for an empty series.
    #[must_use]
    pub fn from_points(points: &[TimeSeriesPoint]) -> Option<Self> {
        let pm25: Vec<f64> = points.iter().map(|p| p.pm25).collect();
        let no2: Vec<f64> = points.iter().map(|p| p.no2).collect();
        Some(Self {
            pm25: PollutantStats::from_values(&pm25)?,
            no2: PollutantStats::from_values(&no2)?,
        })
    }
}

impl PollutantStats {
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let current = *values.last()?;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let trend = trend(values);

        Some(Self {
            current,
            average: mean(values).unwrap_or(current),
            min,
            max,
            trend,
            direction: TrendDirection::from_delta(trend),
        })
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn trend(values: &[f64]) -> f64 {
    let n = values.len();
    let recent = &values[n.saturating_sub(TREND_WINDOW)..];
    let older = &values[n.saturating_sub(2 * TREND_WINDOW)..n.saturating_sub(TREND_WINDOW)];
    match (mean(recent), mean(older)) {
        (Some(recent), Some(older)) => recent - older,
        _ => 0.0,
    }
}
