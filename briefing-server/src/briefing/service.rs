//! Briefing assembly with last-good fallback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use moka::future::Cache as MokaCache;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::CacheConfig;
use crate::domain::{DecodedMetar, DecodedTaf, FlightCategory, Icao, Position, Station};
use crate::stations::StationDirectory;
use crate::weather::{WeatherError, WeatherSource};

use super::assess::{MetarAssessment, PeriodAssessment, assess_periods};

/// Everything the briefing page shows for one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Briefing {
    pub icao: Icao,
    /// Directory entry, if the station is listed.
    pub station: Option<Station>,
    pub metar: DecodedMetar,
    pub assessment: MetarAssessment,
    pub taf: Option<DecodedTaf>,
    /// One entry per TAF period, empty without a TAF.
    pub periods: Vec<PeriodAssessment>,
    /// When this briefing was assembled.
    pub updated_at: DateTime<Utc>,
}

impl Briefing {
    pub fn assemble(
        station: Option<Station>,
        metar: DecodedMetar,
        taf: Option<DecodedTaf>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let assessment = MetarAssessment::of(&metar);
        let periods = taf.as_ref().map(assess_periods).unwrap_or_default();
        Self {
            icao: metar.icao,
            station,
            metar,
            assessment,
            taf,
            periods,
            updated_at,
        }
    }
}

/// A briefing plus whether it is a fallback copy.
#[derive(Debug, Clone, Serialize)]
pub struct BriefingOutcome {
    pub briefing: Arc<Briefing>,
    /// True when the latest fetch failed and an older briefing is served.
    pub stale: bool,
    /// Why the latest fetch failed, when stale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Nearby station with its current category, for the shortcut list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSummary {
    pub station: Station,
    /// `None` when the METAR could not be fetched.
    pub flight_category: Option<FlightCategory>,
}

/// Assembles briefings from a weather source and a station directory.
///
/// The last successful briefing per station is kept so that a failed refresh
/// can still show something, clearly marked as stale.
pub struct BriefingService {
    source: Arc<dyn WeatherSource>,
    directory: Arc<dyn StationDirectory>,
    last_good: MokaCache<Icao, Arc<Briefing>>,
}

impl BriefingService {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        directory: Arc<dyn StationDirectory>,
        config: &CacheConfig,
    ) -> Self {
        let last_good = MokaCache::builder()
            .max_capacity(config.stale_capacity)
            .build();

        Self {
            source,
            directory,
            last_good,
        }
    }

    pub fn source(&self) -> &Arc<dyn WeatherSource> {
        &self.source
    }

    pub fn directory(&self) -> &Arc<dyn StationDirectory> {
        &self.directory
    }

    /// Fetch and assess the current weather for a station.
    ///
    /// On failure, returns the previous briefing marked stale if there is
    /// one; otherwise the error.
    pub async fn briefing(&self, icao: &Icao) -> Result<BriefingOutcome, WeatherError> {
        match self.source.weather(icao).await {
            Ok(report) => {
                let station = self.directory.get(icao);
                let briefing = Arc::new(Briefing::assemble(
                    station,
                    report.metar,
                    report.taf,
                    Utc::now(),
                ));
                self.last_good.insert(*icao, briefing.clone()).await;
                debug!(%icao, category = %briefing.metar.flight_category, "briefing assembled");

                Ok(BriefingOutcome {
                    briefing,
                    stale: false,
                    error: None,
                })
            }
            Err(e) => match self.last_good.get(icao).await {
                Some(previous) => {
                    warn!(%icao, error = %e, updated_at = %previous.updated_at, "serving stale briefing");
                    Ok(BriefingOutcome {
                        briefing: previous,
                        stale: true,
                        error: Some(e.to_string()),
                    })
                }
                None => Err(e),
            },
        }
    }

    /// Nearest stations to `from`, each with its current flight category.
    ///
    /// METARs are fetched concurrently. A failed fetch leaves the category
    /// empty rather than failing the list.
    pub async fn nearby_summaries(&self, from: Position, limit: usize) -> Vec<StationSummary> {
        let stations = self.directory.nearby(from, limit);

        let fetches = stations.iter().map(|s| self.source.metar(&s.icao));
        let results = join_all(fetches).await;

        stations
            .into_iter()
            .zip(results)
            .map(|(station, result)| {
                let flight_category = match result {
                    Ok(metar) => Some(metar.flight_category),
                    Err(e) => {
                        warn!(icao = %station.icao, error = %e, "nearby METAR unavailable");
                        None
                    }
                };
                StationSummary {
                    station,
                    flight_category,
                }
            })
            .collect()
    }
}
