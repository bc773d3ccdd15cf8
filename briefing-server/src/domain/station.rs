//! Airport stations and geographic positions.

use serde::{Deserialize, Serialize};

use super::Icao;

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in kilometres.
    pub fn distance_km(&self, other: &Position) -> f64 {
        haversine::distance(
            haversine::Location::from(*self),
            haversine::Location::from(*other),
            haversine::Units::Kilometers,
        )
    }
}

impl From<Position> for haversine::Location {
    fn from(p: Position) -> Self {
        haversine::Location {
            latitude: p.latitude,
            longitude: p.longitude,
        }
    }
}

/// An airport weather station.
///
/// Stations are issued by a directory and not modified afterwards, except
/// that nearby queries return copies with `distance_km` filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub icao: Icao,
    pub name: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Field elevation in feet (may be negative, e.g. Schiphol).
    pub elevation_ft: i32,
    /// Distance from the reference point of a nearby query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl Station {
    pub fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }

    /// Case-insensitive substring match against code, name, or city.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.icao.as_str().to_ascii_lowercase().contains(needle)
            || self.name.to_lowercase().contains(needle)
            || self.city.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brussels() -> Station {
        Station {
            icao: Icao::parse("EBBR").unwrap(),
            name: "Brussels Airport".into(),
            city: "Brussels".into(),
            country: "Belgium".into(),
            latitude: 50.9014,
            longitude: 4.4844,
            elevation_ft: 184,
            distance_km: None,
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = brussels().position();
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn brussels_to_heathrow() {
        let ebbr = brussels().position();
        let egll = Position::new(51.4700, -0.4543);
        let d = ebbr.distance_km(&egll);
        // Roughly 350 km
        assert!((340.0..360.0).contains(&d), "got {d}");
        assert!((d - egll.distance_km(&ebbr)).abs() < 1e-9);
    }

    #[test]
    fn matches_code_name_and_city() {
        let s = brussels();
        assert!(s.matches("ebbr"));
        assert!(s.matches("airport"));
        assert!(s.matches("bruss"));
        assert!(!s.matches("paris"));
    }

    #[test]
    fn distance_omitted_when_absent() {
        let json = serde_json::to_value(brussels()).unwrap();
        assert!(json.get("distance_km").is_none());
        assert_eq!(json["icao"], "EBBR");
    }
}
