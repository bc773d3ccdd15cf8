//! Station lookup, search, and nearby queries.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::domain::{Icao, Position, Station};

use super::error::StationError;

/// Built-in station list.
static BUILTIN_STATIONS: &str = include_str!("../../data/stations.json");

/// Read-only access to airport stations.
pub trait StationDirectory: Send + Sync {
    /// All stations, in directory order.
    fn list(&self) -> Vec<Station>;

    /// Exact lookup by code.
    fn get(&self, icao: &Icao) -> Option<Station>;

    /// Case-insensitive substring match against code, name, or city.
    ///
    /// Matches keep directory order. A blank query matches nothing.
    fn search(&self, query: &str) -> Vec<Station>;

    /// Up to `limit` stations closest to `from`, with `distance_km` set.
    ///
    /// Sorted ascending by great-circle distance; ties broken by code.
    fn nearby(&self, from: Position, limit: usize) -> Vec<Station>;
}

/// Directory over a fixed, in-memory station list.
#[derive(Debug, Clone)]
pub struct InMemoryDirectory {
    stations: Vec<Station>,
}

impl InMemoryDirectory {
    /// Create a directory from a list of stations.
    ///
    /// Fails if two stations share a code.
    pub fn new(stations: Vec<Station>) -> Result<Self, StationError> {
        let mut seen = HashSet::with_capacity(stations.len());
        for s in &stations {
            if !seen.insert(s.icao) {
                return Err(StationError::DuplicateIcao(s.icao));
            }
        }
        Ok(Self { stations })
    }

    /// Parse a JSON array of stations.
    pub fn from_json(json: &str) -> Result<Self, StationError> {
        let mut stations: Vec<Station> = serde_json::from_str(json)?;
        // Distances only make sense relative to a query
        for s in &mut stations {
            s.distance_km = None;
        }
        Self::new(stations)
    }

    /// Load a JSON array of stations from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::from_json(&json)?;
        debug!(path = %path.display(), stations = directory.len(), "loaded station file");
        Ok(directory)
    }

    /// The eight built-in European and North American stations.
    pub fn builtin() -> Result<Self, StationError> {
        Self::from_json(BUILTIN_STATIONS)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl StationDirectory for InMemoryDirectory {
    fn list(&self) -> Vec<Station> {
        self.stations.clone()
    }

    fn get(&self, icao: &Icao) -> Option<Station> {
        self.stations.iter().find(|s| &s.icao == icao).cloned()
    }

    fn search(&self, query: &str) -> Vec<Station> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.stations
            .iter()
            .filter(|s| s.matches(&needle))
            .cloned()
            .collect()
    }

    fn nearby(&self, from: Position, limit: usize) -> Vec<Station> {
        let mut ranked: Vec<Station> = self
            .stations
            .iter()
            .map(|s| Station {
                distance_km: Some(from.distance_km(&s.position())),
                ..s.clone()
            })
            .collect();

        ranked.sort_by(|a, b| {
            let da = a.distance_km.unwrap_or(f64::INFINITY);
            let db = b.distance_km.unwrap_or(f64::INFINITY);
            da.partial_cmp(&db)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.icao.cmp(&b.icao))
        });
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn icao(s: &str) -> Icao {
        Icao::parse(s).unwrap()
    }

    fn codes(stations: &[Station]) -> Vec<&str> {
        stations.iter().map(|s| s.icao.as_str()).collect()
    }

    fn brussels() -> Position {
        Position::new(50.9014, 4.4844)
    }

    #[test]
    fn builtin_has_eight_stations() {
        let dir = InMemoryDirectory::builtin().unwrap();
        assert_eq!(dir.len(), 8);
        assert_eq!(
            codes(&dir.list()),
            vec!["EBBR", "EBAW", "ELLX", "EHAM", "LFPG", "EGLL", "EDDF", "KJFK"]
        );
        assert!(dir.list().iter().all(|s| s.distance_km.is_none()));
    }

    #[test]
    fn search_is_case_insensitive_over_code_name_and_city() {
        let dir = InMemoryDirectory::builtin().unwrap();

        assert_eq!(codes(&dir.search("eb")), vec!["EBBR", "EBAW"]);
        assert_eq!(codes(&dir.search("LONDON")), vec!["EGLL"]);
        assert_eq!(codes(&dir.search("york")), vec!["KJFK"]);
        assert_eq!(codes(&dir.search("schiphol")), vec!["EHAM"]);
    }

    #[test]
    fn search_keeps_directory_order() {
        let dir = InMemoryDirectory::builtin().unwrap();
        // "airport" appears in several names
        assert_eq!(
            codes(&dir.search("airport")),
            vec!["EBBR", "EBAW", "ELLX", "EDDF"]
        );
    }

    #[test]
    fn blank_search_matches_nothing() {
        let dir = InMemoryDirectory::builtin().unwrap();
        assert!(dir.search("").is_empty());
        assert!(dir.search("   ").is_empty());
        assert!(dir.search("zzzz").is_empty());
    }

    #[test]
    fn exact_search_result_is_in_list() {
        let dir = InMemoryDirectory::builtin().unwrap();
        let all = dir.list();
        for station in &all {
            let found = dir.search(station.icao.as_str());
            let hit = found.iter().find(|s| s.icao == station.icao).unwrap();
            assert!(all.contains(hit));
        }
    }

    #[test]
    fn get_by_code() {
        let dir = InMemoryDirectory::builtin().unwrap();
        assert_eq!(dir.get(&icao("LFPG")).unwrap().city, "Paris");
        assert!(dir.get(&icao("ZZZZ")).is_none());
    }

    #[test]
    fn nearby_sorted_by_distance() {
        let dir = InMemoryDirectory::builtin().unwrap();
        let near = dir.nearby(brussels(), 3);

        assert_eq!(codes(&near), vec!["EBBR", "EBAW", "EHAM"]);
        assert!(near[0].distance_km.unwrap() < 0.001);
        let d: Vec<f64> = near.iter().map(|s| s.distance_km.unwrap()).collect();
        assert!(d.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn nearby_is_stable_across_calls() {
        let dir = InMemoryDirectory::builtin().unwrap();
        assert_eq!(dir.nearby(brussels(), 8), dir.nearby(brussels(), 8));
    }

    #[test]
    fn nearby_limit() {
        let dir = InMemoryDirectory::builtin().unwrap();
        assert_eq!(dir.nearby(brussels(), 0).len(), 0);
        assert_eq!(dir.nearby(brussels(), 100).len(), 8);
        // New York is always furthest from Brussels
        assert_eq!(dir.nearby(brussels(), 8)[7].icao.as_str(), "KJFK");
    }

    #[test]
    fn nearby_ties_broken_by_code() {
        let make = |code: &str| Station {
            icao: icao(code),
            name: code.to_string(),
            city: "Same".into(),
            country: "Nowhere".into(),
            latitude: 10.0,
            longitude: 10.0,
            elevation_ft: 0,
            distance_km: None,
        };
        let dir = InMemoryDirectory::new(vec![make("CCCC"), make("AAAA"), make("BBBB")]).unwrap();
        let near = dir.nearby(Position::new(0.0, 0.0), 3);
        assert_eq!(codes(&near), vec!["AAAA", "BBBB", "CCCC"]);
    }

    #[test]
    fn duplicate_codes_rejected() {
        let json = r#"[
            {"icao":"EBBR","name":"A","city":"B","country":"C","latitude":0,"longitude":0,"elevation_ft":0},
            {"icao":"EBBR","name":"D","city":"E","country":"F","latitude":0,"longitude":0,"elevation_ft":0}
        ]"#;
        let err = InMemoryDirectory::from_json(json).unwrap_err();
        assert!(matches!(err, StationError::DuplicateIcao(_)));
    }

    #[test]
    fn invalid_code_rejected() {
        let json = r#"[{"icao":"ebbr","name":"A","city":"B","country":"C","latitude":0,"longitude":0,"elevation_ft":0}]"#;
        assert!(matches!(
            InMemoryDirectory::from_json(json),
            Err(StationError::Json(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stations.json");
        std::fs::write(
            &path,
            r#"[{"icao":"LEMD","name":"Madrid Barajas","city":"Madrid","country":"Spain","latitude":40.4719,"longitude":-3.5626,"elevation_ft":1998}]"#,
        )
        .unwrap();

        let stations = InMemoryDirectory::from_path(&path).unwrap();
        assert_eq!(codes(&stations.list()), vec!["LEMD"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = InMemoryDirectory::from_path("/nonexistent/stations.json").unwrap_err();
        assert!(matches!(err, StationError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/stations.json"));
    }
}
