//! Catalog of supported cities and their pollutant baselines
//!
//! Lookups are lenient: an id that is not in the catalog resolves to the
//! first (default) city instead of failing, so the dashboard always gets data.

use chrono_tz::{Asia, Tz};

use crate::models::{CityProfile, CitySummary, PollutantBaseline};

/// Static reference row; converted to a [`CityProfile`] when the catalog is built
struct CityRow {
    id: &'static str,
    name: &'static str,
    code: &'static str,
    region: &'static str,
    latitude: f64,
    longitude: f64,
    stations: &'static [&'static str],
    baseline: PollutantBaseline,
}

const TIMEZONE: Tz = Asia::Manila;

// The first row is the fallback profile.
const CITY_TABLE: &[CityRow] = &[
    CityRow {
        id: "metro-manila",
        name: "Metro Manila",
        code: "NCR",
        region: "National Capital Region",
        latitude: 14.5995,
        longitude: 120.9842,
        stations: &["DENR-EMB-NCR-001", "DENR-EMB-NCR-002", "DENR-EMB-NCR-003"],
        baseline: PollutantBaseline::new(45.0, 28.0, 15.0),
    },
    CityRow {
        id: "cebu",
        name: "Cebu City",
        code: "CEB",
        region: "Central Visayas",
        latitude: 10.3157,
        longitude: 123.8854,
        stations: &["DENR-EMB-VII-001", "DENR-EMB-VII-002"],
        baseline: PollutantBaseline::new(32.0, 22.0, 10.0),
    },
    CityRow {
        id: "davao",
        name: "Davao City",
        code: "DVO",
        region: "Davao Region",
        latitude: 7.1907,
        longitude: 125.4553,
        stations: &["DENR-EMB-XI-001", "DENR-EMB-XI-002"],
        baseline: PollutantBaseline::new(25.0, 18.0, 8.0),
    },
    CityRow {
        id: "baguio",
        name: "Baguio City",
        code: "BAG",
        region: "Cordillera Administrative Region",
        latitude: 16.4023,
        longitude: 120.5960,
        stations: &["DENR-EMB-CAR-001"],
        baseline: PollutantBaseline::new(15.0, 12.0, 5.0),
    },
    CityRow {
        id: "iloilo",
        name: "Iloilo City",
        code: "ILO",
        region: "Western Visayas",
        latitude: 10.7202,
        longitude: 122.5621,
        stations: &["DENR-EMB-VI-001"],
        baseline: PollutantBaseline::new(28.0, 20.0, 8.0),
    },
    CityRow {
        id: "cagayan-de-oro",
        name: "Cagayan de Oro",
        code: "CDO",
        region: "Northern Mindanao",
        latitude: 8.4542,
        longitude: 124.6319,
        stations: &["DENR-EMB-X-001"],
        baseline: PollutantBaseline::new(22.0, 16.0, 6.0),
    },
    CityRow {
        id: "zamboanga",
        name: "Zamboanga City",
        code: "ZAM",
        region: "Zamboanga Peninsula",
        latitude: 6.9214,
        longitude: 122.0790,
        stations: &["DENR-EMB-IX-001"],
        baseline: PollutantBaseline::new(20.0, 14.0, 5.0),
    },
    CityRow {
        id: "general-santos",
        name: "General Santos",
        code: "GEN",
        region: "SOCCSKSARGEN",
        latitude: 6.1164,
        longitude: 125.1716,
        stations: &["DENR-EMB-XII-001"],
        baseline: PollutantBaseline::new(18.0, 13.0, 5.0),
    },
];

impl From<&CityRow> for CityProfile {
    fn from(row: &CityRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name.to_string(),
            code: row.code.to_string(),
            region: row.region.to_string(),
            latitude: row.latitude,
            longitude: row.longitude,
            timezone: TIMEZONE,
            stations: row.stations.iter().map(|s| (*s).to_string()).collect(),
            baseline: row.baseline,
        }
    }
}

/// Ordered, non-empty set of city profiles
#[derive(Debug, Clone)]
pub struct CityCatalog {
    cities: Vec<CityProfile>,
}

impl Default for CityCatalog {
    fn default() -> Self {
        Self::philippines()
    }
}

impl CityCatalog {
    /// The built-in Philippine cities.
    #[must_use]
    pub fn philippines() -> Self {
        Self {
            cities: CITY_TABLE.iter().map(CityProfile::from).collect(),
        }
    }

    /// Exact lookup without fallback.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CityProfile> {
        self.cities.iter().find(|c| c.id == id)
    }

    /// Lookup that substitutes the default profile for unknown ids.
    #[must_use]
    pub fn resolve(&self, id: &str) -> &CityProfile {
        self.get(id).unwrap_or_else(|| {
            tracing::debug!(city_id = id, fallback = %self.default_city().id, "unknown city id");
            self.default_city()
        })
    }

    #[must_use]
    pub fn default_city(&self) -> &CityProfile {
        // Constructors guarantee at least one city.
        &self.cities[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CityProfile> {
        self.cities.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<CitySummary> {
        self.cities.iter().map(CitySummary::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_builtin_catalog_has_eight_cities() {
        let catalog = CityCatalog::philippines();
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.default_city().id, "metro-manila");
        assert!(catalog.iter().all(|c| c.timezone == Asia::Manila));
    }

    #[rstest]
    #[case("metro-manila", 45.0, 28.0, 15.0)]
    #[case("cebu", 32.0, 22.0, 10.0)]
    #[case("davao", 25.0, 18.0, 8.0)]
    #[case("baguio", 15.0, 12.0, 5.0)]
    #[case("iloilo", 28.0, 20.0, 8.0)]
    #[case("cagayan-de-oro", 22.0, 16.0, 6.0)]
    #[case("zamboanga", 20.0, 14.0, 5.0)]
    #[case("general-santos", 18.0, 13.0, 5.0)]
    fn test_baselines(#[case] id: &str, #[case] pm25: f64, #[case] no2: f64, #[case] variance: f64) {
        let catalog = CityCatalog::philippines();
        let city = catalog.get(id).expect("city should exist");
        assert_eq!(city.baseline, PollutantBaseline::new(pm25, no2, variance));
    }

    #[rstest]
    #[case("nonexistent")]
    #[case("")]
    #[case("MANILA")]
    fn test_unknown_ids_fall_back_to_first_city(#[case] id: &str) {
        let catalog = CityCatalog::philippines();
        assert!(catalog.get(id).is_none());
        assert_eq!(catalog.resolve(id).id, "metro-manila");
    }

    #[test]
    fn test_summaries_preserve_order() {
        let ids: Vec<String> = CityCatalog::philippines()
            .summaries()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids.first().map(String::as_str), Some("metro-manila"));
        assert_eq!(ids.last().map(String::as_str), Some("general-santos"));
    }
}
