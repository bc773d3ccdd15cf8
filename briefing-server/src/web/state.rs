//! Application state for the web layer.

use std::sync::Arc;

use crate::briefing::BriefingService;
use crate::config::ServerConfig;
use crate::stations::StationDirectory;
use crate::weather::WeatherSource;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Station list, search, and nearby queries
    pub directory: Arc<dyn StationDirectory>,

    /// Weather source (usually cached)
    pub source: Arc<dyn WeatherSource>,

    /// Briefing assembly with stale fallback
    pub briefings: Arc<BriefingService>,

    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new app state.
    ///
    /// The briefing service shares the given directory and source.
    pub fn new(
        directory: Arc<dyn StationDirectory>,
        source: Arc<dyn WeatherSource>,
        config: ServerConfig,
    ) -> Self {
        let briefings = Arc::new(BriefingService::new(
            source.clone(),
            directory.clone(),
            &config.cache,
        ));

        Self {
            directory,
            source,
            briefings,
            config: Arc::new(config),
        }
    }
}
