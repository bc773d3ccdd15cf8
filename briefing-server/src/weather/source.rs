//! The weather source seam.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{DecodedMetar, DecodedTaf, Icao};

use super::error::WeatherError;

/// Current conditions and forecast for one station, fetched together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub metar: DecodedMetar,
    /// `None` when the station publishes no forecast.
    pub taf: Option<DecodedTaf>,
}

/// Provider of decoded METAR/TAF data.
///
/// Implementations must treat an unknown station as a normal case: `metar`
/// returns a synthetic observation and `taf` returns `None`.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Latest observation for a station.
    async fn metar(&self, icao: &Icao) -> Result<DecodedMetar, WeatherError>;

    /// Current forecast for a station, if one exists.
    async fn taf(&self, icao: &Icao) -> Result<Option<DecodedTaf>, WeatherError>;

    /// Fetch METAR and TAF concurrently.
    ///
    /// Fails if either fetch fails; no partial report is returned.
    async fn weather(&self, icao: &Icao) -> Result<WeatherReport, WeatherError> {
        let (metar, taf) = tokio::join!(self.metar(icao), self.taf(icao));
        Ok(WeatherReport {
            metar: metar?,
            taf: taf?,
        })
    }
}
