//! Synthetic air-quality generator
//!
//! Produces hourly PM2.5/NO₂ series shaped by a city's baseline and a
//! rush-hour schedule, augments them with ambient weather, and derives a
//! classification with normalized pseudo-probabilities from the latest
//! sample. Every operation takes its random source explicitly; the only
//! other input is the injected [`Clock`].

mod ambient;
mod prediction;
mod series;

use std::sync::Arc;

use rand::RngExt;
use tracing::instrument;

use crate::{
    Result,
    cities::CityCatalog,
    clock::{Clock, SystemClock},
    error::AirWatchError,
    models::{Classification, Measurement, PredictionResult, TimeSeriesPoint},
};

pub use prediction::probability_ranges;
pub use series::{NO2_FLOOR, PM25_FLOOR, rush_hour_multiplier};

/// Horizon used for the ambient measurement table
pub const MEASUREMENT_HOURS: u32 = 24;
/// Default horizon of the dashboard chart
pub const SERIES_HOURS: u32 = 72;
/// Reported when no model version is configured
pub const DEFAULT_MODEL_VERSION: &str = "v1.2.0";

/// Classify a PM2.5 concentration (µg/m³).
#[must_use]
pub fn classify(pm25: f64) -> Classification {
    Classification::from_pm25(pm25)
}

/// Stateless generator over a city catalog and a clock
#[derive(Clone)]
pub struct SeriesGenerator {
    catalog: Arc<CityCatalog>,
    clock: Arc<dyn Clock>,
    model_version: String,
}

impl Default for SeriesGenerator {
    fn default() -> Self {
        Self::new(Arc::new(CityCatalog::default()), Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for SeriesGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesGenerator")
            .field("cities", &self.catalog.len())
            .field("model_version", &self.model_version)
            .finish_non_exhaustive()
    }
}

impl SeriesGenerator {
    pub fn new(catalog: Arc<CityCatalog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            clock,
            model_version: DEFAULT_MODEL_VERSION.to_string(),
        }
    }

    #[must_use]
    pub fn with_model_version<S: Into<String>>(mut self, version: S) -> Self {
        self.model_version = version.into();
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Hourly series of `hours + 1` points ending at the clock's current
    /// time, oldest first. Unknown `city_id`s use the default city.
    #[instrument(level = "debug", skip(self, rng))]
    pub fn generate_series<R: RngExt>(
        &self,
        city_id: &str,
        hours: u32,
        rng: &mut R,
    ) -> Vec<TimeSeriesPoint> {
        let city = self.catalog.resolve(city_id);
        let now = self.clock.now();

        series::hourly_timestamps(now, hours)
            .map(|timestamp| {
                let hour = series::local_hour(timestamp, &city.timezone);
                series::sample_point(rng, &city.baseline, timestamp, hour)
            })
            .collect()
    }

    /// The last 24 hours with ambient weather attached to each point.
    pub fn generate_measurements<R: RngExt>(&self, city_id: &str, rng: &mut R) -> Vec<Measurement> {
        self.generate_measurements_over(city_id, MEASUREMENT_HOURS, rng)
    }

    /// Like [`Self::generate_measurements`] over an arbitrary horizon.
    #[instrument(level = "debug", skip(self, rng))]
    pub fn generate_measurements_over<R: RngExt>(
        &self,
        city_id: &str,
        hours: u32,
        rng: &mut R,
    ) -> Vec<Measurement> {
        self.generate_series(city_id, hours, rng)
            .into_iter()
            .map(|point| ambient::with_ambient(rng, point))
            .collect()
    }

    /// Classification of a fresh synthetic sample for `city_id`.
    #[instrument(level = "debug", skip(self, rng))]
    pub fn generate_prediction<R: RngExt>(&self, city_id: &str, rng: &mut R) -> PredictionResult {
        let series = self.generate_series(city_id, 1, rng);
        // `generate_series` always yields `hours + 1` points.
        let latest = series[series.len() - 1];
        let result = prediction::predict_sample(rng, &latest, &self.model_version);
        tracing::debug!(
            status = %result.status,
            confidence = result.confidence,
            pm25 = result.pm25,
            "generated prediction"
        );
        result
    }

    /// Classification of a caller-supplied reading, timestamped now.
    pub fn predict_reading<R: RngExt>(
        &self,
        pm25: f64,
        no2: f64,
        rng: &mut R,
    ) -> Result<PredictionResult> {
        validate_reading("pm25", pm25)?;
        validate_reading("no2", no2)?;

        let sample = TimeSeriesPoint {
            timestamp: self.clock.now(),
            pm25,
            no2,
        };
        Ok(prediction::predict_sample(rng, &sample, &self.model_version))
    }
}

fn validate_reading(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(AirWatchError::validation(format!("{name} must be a finite number")));
    }
    if value < 0.0 {
        return Err(AirWatchError::validation(format!("{name} cannot be negative")));
    }
    Ok(())
}
