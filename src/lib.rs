//! `AirWatch` - Air-quality dashboard backend for Philippine cities
//!
//! This library provides the synthetic PM2.5/NO₂ series generator, the
//! threshold classification with pseudo-probabilities, and the HTTP API
//! that serves them to the dashboard.

pub mod api;
pub mod cities;
pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod stats;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use api::{AppState, RngSource};
pub use cities::CityCatalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AirWatchConfig;
pub use error::AirWatchError;
pub use generator::{SeriesGenerator, classify};
pub use models::{
    CityProfile, ClassProbabilities, Classification, Measurement, PredictionResult,
    TimeSeriesPoint,
};
pub use stats::{SeriesStats, TrendDirection};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AirWatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
