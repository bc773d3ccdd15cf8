//! Decoded METAR (current conditions) report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Altimeter, FlightCategory, Icao, Sky, Visibility, Wind};

/// A decoded routine weather observation.
///
/// The raw report text is carried alongside for inspection panels; nothing
/// here is re-derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedMetar {
    pub icao: Icao,
    pub observed_at: DateTime<Utc>,
    pub raw: String,
    pub flight_category: FlightCategory,
    pub wind: Wind,
    pub visibility: Visibility,
    /// Cloud layers and the ceiling derived from them.
    pub sky: Sky,
    /// Present-weather codes such as `-RA`, `BR`, `+TSRA`.
    pub weather: Vec<String>,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Degrees Celsius.
    pub dewpoint: f64,
    pub altimeter: Altimeter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl DecodedMetar {
    /// Convenience for `self.sky.ceiling()`.
    pub fn ceiling(&self) -> Option<u32> {
        self.sky.ceiling()
    }

    /// Temperature minus dewpoint, in °C.
    pub fn spread(&self) -> f64 {
        self.temperature - self.dewpoint
    }
}
