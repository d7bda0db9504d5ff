use anyhow::{Context, Result};
use climate_api::{AppState, ClimateApiConfig, Dataset, QueryWindow, web};
use climate_api::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", logging.level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClimateApiConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);
    tracing::info!("Starting climate-api {}", climate_api::VERSION);

    let dataset = Dataset::open(&config.database)
        .await
        .with_context(|| format!("Failed to open dataset {}", config.database.path))?;

    let mut window = QueryWindow::from_config(&config.query)?;
    if config.query.derive_from_data {
        window = QueryWindow::derive(&dataset, window).await?;
    }
    tracing::info!(
        "Lookback window starts {} for station {}",
        window.lower_bound(),
        window.station_id()
    );

    web::run(&config, AppState::new(dataset, window)).await
}
