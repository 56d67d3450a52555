use chrono::{DateTime, Duration, Timelike, Utc};
use rand::RngExt;

use crate::models::{PollutantBaseline, TimeSeriesPoint};

pub const PM25_FLOOR: f64 = 5.0;
pub const NO2_FLOOR: f64 = 3.0;

/// NO₂ noise spans this fraction of the variance on each side.
const NO2_NOISE_FRACTION: f64 = 0.35;

const RANDOM_FACTOR_MIN: f64 = 0.8;
const RANDOM_FACTOR_MAX: f64 = 1.2;

/// Traffic multiplier for a local hour of day (0-23).
#[must_use]
pub fn rush_hour_multiplier(hour: u32) -> f64 {
    match hour {
        7..=9 | 17..=20 => 1.3,
        10..=16 => 1.1,
        _ => 0.8,
    }
}

/// Uniform draw in `[-half_width, half_width]`.
fn symmetric_noise<R: RngExt>(rng: &mut R, half_width: f64) -> f64 {
    rng.random_range(-half_width..=half_width)
}

/// One sample for the given instant. `local_hour` selects the multiplier.
pub(crate) fn sample_point<R: RngExt>(
    rng: &mut R,
    baseline: &PollutantBaseline,
    timestamp: DateTime<Utc>,
    local_hour: u32,
) -> TimeSeriesPoint {
    let multiplier = rush_hour_multiplier(local_hour);
    let random_factor = rng.random_range(RANDOM_FACTOR_MIN..=RANDOM_FACTOR_MAX);
    let pm25_noise = symmetric_noise(rng, baseline.variance / 2.0);
    let no2_noise = symmetric_noise(rng, baseline.variance * NO2_NOISE_FRACTION);

    TimeSeriesPoint {
        timestamp,
        pm25: (baseline.base_pm25 * multiplier * random_factor + pm25_noise).max(PM25_FLOOR),
        no2: (baseline.base_no2 * multiplier * random_factor + no2_noise).max(NO2_FLOOR),
    }
}

/// Hourly timestamps `now - hours`, ..., `now`, oldest first.
pub(crate) fn hourly_timestamps(now: DateTime<Utc>, hours: u32) -> impl Iterator<Item = DateTime<Utc>> {
    (0..=hours)
        .rev()
        .map(move |offset| now - Duration::hours(i64::from(offset)))
}

/// Hour of day of `timestamp` in the given timezone.
pub(crate) fn local_hour<Tz: chrono::TimeZone>(timestamp: DateTime<Utc>, tz: &Tz) -> u32 {
    timestamp.with_timezone(tz).hour()
}
