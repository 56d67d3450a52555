use std::ops::RangeInclusive;

use rand::RngExt;

use crate::models::{Measurement, TimeSeriesPoint};

const TEMPERATURE_C: RangeInclusive<f64> = 26.0..=34.0;
const HUMIDITY_PCT: RangeInclusive<f64> = 60.0..=90.0;
const WIND_SPEED_MS: RangeInclusive<f64> = 2.0..=10.0;
const RAINFALL_MM: RangeInclusive<f64> = 0.0..=10.0;
const RAIN_PROBABILITY: f64 = 0.2;

/// Attach independently drawn ambient conditions to a pollutant sample.
pub(crate) fn with_ambient<R: RngExt>(rng: &mut R, point: TimeSeriesPoint) -> Measurement {
    let temperature = rng.random_range(TEMPERATURE_C);
    let humidity = rng.random_range(HUMIDITY_PCT);
    let wind_speed = rng.random_range(WIND_SPEED_MS);
    let rainfall = if rng.random_bool(RAIN_PROBABILITY) {
        rng.random_range(RAINFALL_MM)
    } else {
        0.0
    };

    Measurement {
        point,
        temperature,
        humidity,
        wind_speed,
        rainfall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_ambient_fields_within_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let point = TimeSeriesPoint {
            timestamp: Utc::now(),
            pm25: 20.0,
            no2: 10.0,
        };

        let mut dry = 0;
        for _ in 0..1_000 {
            let m = with_ambient(&mut rng, point);
            assert_eq!(m.point, point);
            assert!(TEMPERATURE_C.contains(&m.temperature));
            assert!(HUMIDITY_PCT.contains(&m.humidity));
            assert!(WIND_SPEED_MS.contains(&m.wind_speed));
            assert!(RAINFALL_MM.contains(&m.rainfall));
            if m.rainfall == 0.0 {
                dry += 1;
            }
        }
        // Roughly 80% of hours are dry.
        assert!((700..=900).contains(&dry), "dry hours: {dry}");
    }
}
