use std::ops::RangeInclusive;

use rand::RngExt;

use crate::models::{ClassProbabilities, Classification, PredictionResult, TimeSeriesPoint};

/// Draw ranges for the (good, moderate, hazardous) weights, conditioned on
/// the classified status. The matching class always outweighs the others.
#[must_use]
pub fn probability_ranges(status: Classification) -> [RangeInclusive<f64>; 3] {
    match status {
        Classification::Good => [0.70..=0.90, 0.10..=0.25, 0.02..=0.07],
        Classification::Moderate => [0.15..=0.30, 0.55..=0.80, 0.10..=0.25],
        Classification::Hazardous => [0.02..=0.07, 0.15..=0.30, 0.65..=0.90],
    }
}

/// Draw a class-conditioned probability triple and normalize it.
pub(crate) fn draw_probabilities<R: RngExt>(
    rng: &mut R,
    status: Classification,
) -> ClassProbabilities {
    let [good, moderate, hazardous] = probability_ranges(status);
    ClassProbabilities {
        good: rng.random_range(good),
        moderate: rng.random_range(moderate),
        hazardous: rng.random_range(hazardous),
    }
    .normalized()
}

/// Classify `sample` and attach drawn probabilities.
pub(crate) fn predict_sample<R: RngExt>(
    rng: &mut R,
    sample: &TimeSeriesPoint,
    model_version: &str,
) -> PredictionResult {
    let status = Classification::from_pm25(sample.pm25);
    let probabilities = draw_probabilities(rng, status);

    PredictionResult {
        status,
        confidence: probabilities.max(),
        probabilities,
        pm25: sample.pm25,
        no2: sample.no2,
        timestamp: sample.timestamp,
        model_version: model_version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use rstest::rstest;

    #[rstest]
    #[case(Classification::Good)]
    #[case(Classification::Moderate)]
    #[case(Classification::Hazardous)]
    fn test_matching_class_dominates(#[case] status: Classification) {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..500 {
            let probs = draw_probabilities(&mut rng, status);
            assert!((probs.total() - 1.0).abs() < 1e-9);
            assert_eq!(probs.max(), probs.get(status));
        }
    }

    #[test]
    fn test_ranges_never_overlap_with_matching_class() {
        for status in Classification::ALL {
            let ranges = probability_ranges(status);
            let own = match status {
                Classification::Good => &ranges[0],
                Classification::Moderate => &ranges[1],
                Classification::Hazardous => &ranges[2],
            };
            for range in &ranges {
                if !std::ptr::eq(range, own) {
                    assert!(range.end() < own.start());
                }
            }
        }
    }
}
