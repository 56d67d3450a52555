use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    Result, VERSION,
    config::GeneratorConfig,
    generator::SeriesGenerator,
    models::{
        CitySummary, Classification, Measurement, PredictionResult, TimeSeriesPoint,
        prediction::{GOOD_MAX_PM25, MODERATE_MAX_PM25},
    },
    stats::SeriesStats,
};

const SERVICE_NAME: &str = "Air Quality API";

/// Where each request gets its random numbers from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngSource {
    /// Fresh entropy per request
    Entropy,
    /// Every request replays the same sequence
    Seeded(u64),
}

impl RngSource {
    #[must_use]
    pub fn rng(self) -> StdRng {
        match self {
            RngSource::Entropy => StdRng::from_rng(&mut rand::rng()),
            RngSource::Seeded(seed) => StdRng::seed_from_u64(seed),
        }
    }
}

impl From<Option<u64>> for RngSource {
    fn from(seed: Option<u64>) -> Self {
        seed.map_or(RngSource::Entropy, RngSource::Seeded)
    }
}

/// Immutable state shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub generator: Arc<SeriesGenerator>,
    pub horizons: GeneratorConfig,
    pub rng_source: RngSource,
}

impl AppState {
    pub fn new(generator: SeriesGenerator, horizons: GeneratorConfig) -> Self {
        let rng_source = RngSource::from(horizons.seed);
        Self {
            generator: Arc::new(generator),
            horizons,
            rng_source,
        }
    }

    /// Parse a requested horizon leniently: missing or malformed values use
    /// `default`, oversized values are clamped to the configured maximum.
    fn horizon(&self, requested: Option<&str>, default: u32) -> u32 {
        requested
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(default)
            .min(self.horizons.max_hours)
    }
}

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    #[serde(rename = "cityId")]
    pub city_id: Option<String>,
    #[serde(rename = "cityName")]
    pub city_name: Option<String>,
    pub hours: Option<String>,
}

impl CityQuery {
    fn city_id(&self) -> &str {
        self.city_id.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub model_loaded: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CitiesResponse {
    pub data: Vec<CitySummary>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDataResponse {
    /// The id as requested, even when it fell back to the default city
    pub city_id: String,
    pub city: CitySummary,
    pub time_series: Vec<TimeSeriesPoint>,
    pub measurements: Vec<Measurement>,
    pub stats: Option<SeriesStats>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub city_id: String,
    pub city_name: String,
    #[serde(flatten)]
    pub prediction: PredictionResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassThreshold {
    pub status: Classification,
    /// Inclusive PM2.5 upper bound; `None` for the top class
    pub max_pm25: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfoResponse {
    pub loaded: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub model_version: String,
    pub description: &'static str,
    pub classes: Vec<ClassThreshold>,
}

#[derive(Debug, Deserialize)]
pub struct ReadingRequest {
    pub pm25: f64,
    #[serde(default)]
    pub no2: f64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/cities", get(get_cities))
        .route("/city_data", get(get_city_data))
        .route("/predict", get(get_prediction))
        .route("/predict/custom", post(predict_custom))
        .route("/model/info", get(get_model_info))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: VERSION,
        model_loaded: true,
        timestamp: Utc::now(),
    })
}

async fn get_cities(State(state): State<AppState>) -> Json<CitiesResponse> {
    let data = state.generator.catalog().summaries();
    Json(CitiesResponse {
        count: data.len(),
        data,
    })
}

#[instrument(skip(state))]
async fn get_city_data(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Json<CityDataResponse> {
    let generator = &state.generator;
    let city_id = query.city_id();
    let hours = state.horizon(query.hours.as_deref(), state.horizons.series_hours);
    let mut rng = state.rng_source.rng();

    let time_series = generator.generate_series(city_id, hours, &mut rng);
    let measurements =
        generator.generate_measurements_over(city_id, state.horizons.measurement_hours, &mut rng);
    let stats = SeriesStats::from_points(&time_series);

    Json(CityDataResponse {
        city_id: city_id.to_string(),
        city: CitySummary::from(generator.catalog().resolve(city_id)),
        time_series,
        measurements,
        stats,
    })
}

#[instrument(skip(state))]
async fn get_prediction(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Json<PredictionResponse> {
    let city_id = query.city_id();
    let mut rng = state.rng_source.rng();
    let prediction = state.generator.generate_prediction(city_id, &mut rng);

    let city_name = query
        .city_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(
            || state.generator.catalog().resolve(city_id).name.clone(),
            str::to_string,
        );

    Json(PredictionResponse {
        city_id: city_id.to_string(),
        city_name,
        prediction,
    })
}

#[instrument(skip(state))]
async fn predict_custom(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ReadingRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>> {
    let Json(reading) = payload?;
    let mut rng = state.rng_source.rng();
    let prediction = state
        .generator
        .predict_reading(reading.pm25, reading.no2, &mut rng)?;
    Ok(Json(prediction))
}

async fn get_model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        loaded: true,
        kind: "synthetic",
        model_version: state.generator.model_version().to_string(),
        description: "Rush-hour weighted synthetic PM2.5/NO2 generator with PM2.5 threshold classification",
        classes: vec![
            ClassThreshold {
                status: Classification::Good,
                max_pm25: Some(GOOD_MAX_PM25),
            },
            ClassThreshold {
                status: Classification::Moderate,
                max_pm25: Some(MODERATE_MAX_PM25),
            },
            ClassThreshold {
                status: Classification::Hazardous,
                max_pm25: None,
            },
        ],
    })
}
