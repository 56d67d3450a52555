//! Air-quality classification and prediction results

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// PM2.5 upper bound (inclusive) of the `Good` class, in µg/m³
pub const GOOD_MAX_PM25: f64 = 25.0;
/// PM2.5 upper bound (inclusive) of the `Moderate` class, in µg/m³
pub const MODERATE_MAX_PM25: f64 = 50.0;

/// Air-quality bucket derived from PM2.5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Good,
    Moderate,
    Hazardous,
}

impl Classification {
    pub const ALL: [Classification; 3] = [Self::Good, Self::Moderate, Self::Hazardous];

    /// Threshold rule; boundaries belong to the lower class.
    #[must_use]
    pub fn from_pm25(pm25: f64) -> Self {
        if pm25 <= GOOD_MAX_PM25 {
            Self::Good
        } else if pm25 <= MODERATE_MAX_PM25 {
            Self::Moderate
        } else {
            Self::Hazardous
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Probability mass per class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub good: f64,
    pub moderate: f64,
    pub hazardous: f64,
}

impl ClassProbabilities {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.good + self.moderate + self.hazardous
    }

    /// Scale so the three values sum to one.
    #[must_use]
    pub fn normalized(self) -> Self {
        let total = self.total();
        Self {
            good: self.good / total,
            moderate: self.moderate / total,
            hazardous: self.hazardous / total,
        }
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.good.max(self.moderate).max(self.hazardous)
    }

    #[must_use]
    pub fn get(&self, class: Classification) -> f64 {
        match class {
            Classification::Good => self.good,
            Classification::Moderate => self.moderate,
            Classification::Hazardous => self.hazardous,
        }
    }
}

/// Synthetic prediction for the latest sample of a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub status: Classification,
    /// Largest of the normalized probabilities
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
    pub pm25: f64,
    pub no2: f64,
    pub timestamp: DateTime<Utc>,
    pub model_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Classification::Good)]
    #[case(25.0, Classification::Good)]
    #[case(25.01, Classification::Moderate)]
    #[case(50.0, Classification::Moderate)]
    #[case(50.01, Classification::Hazardous)]
    #[case(300.0, Classification::Hazardous)]
    fn test_threshold_rule(#[case] pm25: f64, #[case] expected: Classification) {
        assert_eq!(Classification::from_pm25(pm25), expected);
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let probs = ClassProbabilities {
            good: 0.8,
            moderate: 0.2,
            hazardous: 0.05,
        }
        .normalized();
        assert!((probs.total() - 1.0).abs() < 1e-12);
        assert_eq!(probs.max(), probs.good);
        assert_eq!(probs.get(Classification::Moderate), probs.moderate);
    }

    #[test]
    fn test_status_serializes_as_label() {
        let value = serde_json::to_value(Classification::Hazardous).unwrap();
        assert_eq!(value, "Hazardous");
        assert_eq!(Classification::Moderate.to_string(), "Moderate");
    }
}
