//! Hourly pollutant samples and their ambient-weather extension

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One simulated hour of pollutant readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Timestamp of the sample (UTC)
    pub timestamp: DateTime<Utc>,
    /// PM2.5 concentration in µg/m³
    pub pm25: f64,
    /// NO₂ concentration in ppb
    pub no2: f64,
}

/// A [`TimeSeriesPoint`] plus independently drawn ambient conditions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(flatten)]
    pub point: TimeSeriesPoint,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Rainfall in mm
    pub rainfall: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_measurement_flattens_point_fields() {
        let measurement = Measurement {
            point: TimeSeriesPoint {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
                pm25: 31.5,
                no2: 19.25,
            },
            temperature: 29.0,
            humidity: 72.0,
            wind_speed: 4.5,
            rainfall: 0.0,
        };

        let value = serde_json::to_value(measurement).unwrap();
        assert_eq!(value["timestamp"], "2024-03-01T08:00:00Z");
        assert_eq!(value["pm25"], 31.5);
        assert_eq!(value["windSpeed"], 4.5);
        assert!(value.get("point").is_none());
    }
}
