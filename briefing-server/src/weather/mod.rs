//! Weather data sources.
//!
//! Everything that produces decoded METAR/TAF data sits behind the
//! [`WeatherSource`] trait:
//! - [`MockWeatherSource`] serves a built-in dataset (the default)
//! - [`HttpWeatherSource`] talks to a JSON backend
//! - [`CachedWeatherSource`](crate::cache::CachedWeatherSource) wraps either
//!
//! Unknown stations are never errors: they get a synthetic METAR and no TAF.

mod client;
mod error;
mod mock;
mod source;
mod synthetic;

pub use client::{ApiConfig, Credentials, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, HttpWeatherSource};
pub use error::WeatherError;
pub use mock::MockWeatherSource;
pub use source::{WeatherReport, WeatherSource};
pub use synthetic::{SyntheticMetars, synthetic_metar};
