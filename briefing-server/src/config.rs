//! Server configuration.
//!
//! All settings have defaults suitable for local development; environment
//! variables override them:
//!
//! | Variable | Default |
//! | --- | --- |
//! | `BRIEFING_ADDR` | `127.0.0.1:3000` |
//! | `BRIEFING_STATIC_DIR` | `briefing-server/static` |
//! | `BRIEFING_STATIONS_FILE` | built-in station list |
//! | `BRIEFING_API_BASE_URL` | unset: serve the mock dataset |
//! | `BRIEFING_API_TIMEOUT_MS` | `10000` |
//! | `BRIEFING_API_USERNAME` / `BRIEFING_API_PASSWORD` | unset |
//! | `BRIEFING_REF_LAT` / `BRIEFING_REF_LON` | Brussels Airport |
//! | `BRIEFING_DEFAULT_STATION` | `EBBR` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::CacheConfig;
use crate::domain::{Icao, Position};
use crate::search::DebounceConfig;
use crate::weather::ApiConfig;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Default static asset directory, relative to the workspace root.
pub const DEFAULT_STATIC_DIR: &str = "briefing-server/static";

/// Default station shown when the dashboard opens.
pub const DEFAULT_STATION: Icao = Icao::from_static("EBBR");

/// Brussels Airport, the default reference point for nearby stations.
pub const DEFAULT_REFERENCE: (f64, f64) = (50.9014, 4.4844);

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
    /// JSON station list; `None` uses the built-in stations.
    pub stations_file: Option<PathBuf>,
    /// Backend to fetch from; `None` uses the mock source.
    pub api: Option<ApiConfig>,
    /// Reference point for nearby-station queries.
    pub reference: Position,
    pub default_station: Icao,
    pub cache: CacheConfig,
    pub debounce: DebounceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            stations_file: None,
            api: None,
            reference: Position::new(DEFAULT_REFERENCE.0, DEFAULT_REFERENCE.1),
            default_station: DEFAULT_STATION,
            cache: CacheConfig::default(),
            debounce: DebounceConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(addr) = get("BRIEFING_ADDR") {
            config.addr = parse_var("BRIEFING_ADDR", &addr)?;
        }

        if let Some(dir) = get("BRIEFING_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        config.stations_file = get("BRIEFING_STATIONS_FILE").map(PathBuf::from);

        if let Some(base_url) = get("BRIEFING_API_BASE_URL") {
            let mut api = ApiConfig::new(base_url);
            if let Some(ms) = get("BRIEFING_API_TIMEOUT_MS") {
                api = api.with_timeout_ms(parse_var("BRIEFING_API_TIMEOUT_MS", &ms)?);
            }
            match (get("BRIEFING_API_USERNAME"), get("BRIEFING_API_PASSWORD")) {
                (Some(user), Some(pass)) => api = api.with_credentials(user, pass),
                (Some(user), None) => {
                    return Err(ConfigError {
                        var: "BRIEFING_API_PASSWORD",
                        value: String::new(),
                        reason: format!("required when BRIEFING_API_USERNAME={user} is set"),
                    });
                }
                _ => {}
            }
            config.api = Some(api);
        }

        let lat = get("BRIEFING_REF_LAT");
        let lon = get("BRIEFING_REF_LON");
        if lat.is_some() || lon.is_some() {
            let latitude = match lat {
                Some(v) => parse_coordinate("BRIEFING_REF_LAT", &v, 90.0)?,
                None => config.reference.latitude,
            };
            let longitude = match lon {
                Some(v) => parse_coordinate("BRIEFING_REF_LON", &v, 180.0)?,
                None => config.reference.longitude,
            };
            config.reference = Position::new(latitude, longitude);
        }

        if let Some(code) = get("BRIEFING_DEFAULT_STATION") {
            config.default_station =
                Icao::parse_normalized(&code).map_err(|e| ConfigError {
                    var: "BRIEFING_DEFAULT_STATION",
                    value: code.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(config)
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn with_stations_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.stations_file = Some(path.into());
        self
    }

    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_reference(mut self, reference: Position) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_default_station(mut self, icao: Icao) -> Self {
        self.default_station = icao;
        self
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_coordinate(var: &'static str, value: &str, limit: f64) -> Result<f64, ConfigError> {
    let parsed: f64 = parse_var(var, value)?;
    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(ConfigError {
            var,
            value: value.to_string(),
            reason: format!("must be within ±{limit}"),
        });
    }
    Ok(parsed)
}
