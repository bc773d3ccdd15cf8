use std::error::Error;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use briefing_server::cache::CachedWeatherSource;
use briefing_server::config::ServerConfig;
use briefing_server::stations::{InMemoryDirectory, StationDirectory};
use briefing_server::weather::{HttpWeatherSource, MockWeatherSource, WeatherSource};
use briefing_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("briefing_server=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let directory = match &config.stations_file {
        Some(path) => {
            info!(path = %path.display(), "loading stations from file");
            InMemoryDirectory::from_path(path)?
        }
        None => InMemoryDirectory::builtin()?,
    };
    info!(stations = directory.len(), "station directory ready");
    let directory: Arc<dyn StationDirectory> = Arc::new(directory);

    let source: Arc<dyn WeatherSource> = match &config.api {
        Some(api) => {
            info!(base_url = %api.base_url, timeout_ms = api.timeout_ms, "using weather API");
            let http = HttpWeatherSource::new(api.clone())?;
            Arc::new(CachedWeatherSource::new(http, &config.cache))
        }
        None => {
            info!("no BRIEFING_API_BASE_URL set, serving mock weather");
            let mock = MockWeatherSource::new(Utc::now())?;
            Arc::new(CachedWeatherSource::new(mock, &config.cache))
        }
    };

    let addr = config.addr;
    info!(
        static_dir = %config.static_dir.display(),
        default_station = %config.default_station,
        "configuration loaded"
    );

    let state = AppState::new(directory, source, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Weather briefing listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
