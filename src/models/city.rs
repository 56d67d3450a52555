//! City reference data: identity, location and pollutant baselines

use chrono_tz::Tz;
use serde::Serialize;

/// Typical pollutant levels around which a city's synthetic series varies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollutantBaseline {
    /// Base PM2.5 concentration in µg/m³
    pub base_pm25: f64,
    /// Base NO₂ concentration in ppb
    pub base_no2: f64,
    /// Spread of the additive noise term
    pub variance: f64,
}

impl PollutantBaseline {
    #[must_use]
    pub const fn new(base_pm25: f64, base_no2: f64, variance: f64) -> Self {
        Self {
            base_pm25,
            base_no2,
            variance,
        }
    }
}

/// Immutable description of a supported city
#[derive(Debug, Clone, PartialEq)]
pub struct CityProfile {
    /// Stable identifier used in API queries (e.g. `metro-manila`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Short code shown on the dashboard (e.g. `NCR`)
    pub code: String,
    /// Administrative region
    pub region: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Local timezone, used to place rush hours
    pub timezone: Tz,
    /// Monitoring station identifiers
    pub stations: Vec<String>,
    pub baseline: PollutantBaseline,
}

/// Public view of a city as listed by the API
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CitySummary {
    pub id: String,
    pub name: String,
    pub code: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub stations: Vec<String>,
}

impl From<&CityProfile> for CitySummary {
    fn from(city: &CityProfile) -> Self {
        Self {
            id: city.id.clone(),
            name: city.name.clone(),
            code: city.code.clone(),
            region: city.region.clone(),
            latitude: city.latitude,
            longitude: city.longitude,
            timezone: city.timezone.name().to_string(),
            stations: city.stations.clone(),
        }
    }
}
