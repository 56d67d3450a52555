use std::{path::PathBuf, sync::Arc};

use airwatch::{
    AirWatchConfig, AppState, CityCatalog, SeriesGenerator, SystemClock, telemetry, web,
};
use anyhow::{Context, Result};

fn main() -> Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AirWatchConfig::load_from_path(config_path.clone())
        .context("Failed to load configuration")?;

    // OTLP exporters use a blocking HTTP client; keep them outside the runtime.
    let _telemetry = telemetry::init(&config.logging)?;

    let config_source = config_path
        .or_else(AirWatchConfig::get_config_path)
        .filter(|path| path.exists());
    match &config_source {
        Some(path) => tracing::info!("Using config from: {}", path.display()),
        None => tracing::info!("No config file found, using defaults and environment"),
    }

    let catalog = CityCatalog::philippines();
    tracing::info!(
        cities = catalog.len(),
        model_version = %config.generator.model_version,
        seeded = config.generator.seed.is_some(),
        "Starting AirWatch v{}",
        airwatch::VERSION
    );

    let generator = SeriesGenerator::new(Arc::new(catalog), Arc::new(SystemClock))
        .with_model_version(config.generator.model_version.clone());
    let state = AppState::new(generator, config.generator.clone());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(web::run(state, &config.server))
}
