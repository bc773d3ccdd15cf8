//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::briefing::StationSummary;
use crate::domain::Station;

/// Default number of nearby stations.
pub const DEFAULT_NEARBY_LIMIT: usize = 4;

/// Upper bound on requested nearby stations.
pub const MAX_NEARBY_LIMIT: usize = 50;

/// Query selecting a single station.
#[derive(Debug, Deserialize)]
pub struct IcaoQuery {
    /// ICAO code, any case
    pub icao: String,
}

/// Request to search stations.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Free-text query (code, name, or city)
    #[serde(default)]
    pub q: String,

    /// Client sequence number, echoed back so stale responses can be dropped
    pub seq: Option<u64>,
}

/// Station search results.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    /// Echo of the request's sequence number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,

    pub stations: Vec<Station>,
}

/// Request for stations near a point.
#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    /// Maximum number of stations (default 4, capped at 50)
    pub limit: Option<usize>,

    /// Reference latitude (defaults to the configured reference)
    pub lat: Option<f64>,

    /// Reference longitude (defaults to the configured reference)
    pub lon: Option<f64>,
}

impl NearbyRequest {
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_NEARBY_LIMIT)
            .min(MAX_NEARBY_LIMIT)
    }
}

/// Nearby stations with their current flight category.
#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub stations: Vec<StationSummary>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
