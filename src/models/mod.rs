//! Data models for the AirWatch backend
//!
//! This module contains the core domain models organized by concern:
//! - City: reference data and pollutant baselines
//! - Series: hourly pollutant samples and measurements
//! - Prediction: classification and probability results

pub mod city;
pub mod prediction;
pub mod series;

// Re-export all public types for convenient access
pub use city::{CityProfile, CitySummary, PollutantBaseline};
pub use prediction::{ClassProbabilities, Classification, PredictionResult};
pub use series::{Measurement, TimeSeriesPoint};
