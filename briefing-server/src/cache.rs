//! Caching layer for weather source responses.
//!
//! Observations change at most every half hour, so a short TTL removes
//! repeated fetches from page refreshes and nearby-station summaries without
//! noticeably delaying new reports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{DecodedMetar, DecodedTaf, Icao};
use crate::weather::{WeatherError, WeatherSource};

/// Configuration for the caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for fresh entries.
    pub ttl: Duration,

    /// Maximum number of fresh entries per report kind.
    pub max_capacity: u64,

    /// Maximum number of last-good briefings kept for stale fallback.
    pub stale_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
            stale_capacity: 1000,
        }
    }
}

/// Cache of decoded reports keyed by station.
pub struct WeatherCache {
    metars: MokaCache<Icao, Arc<DecodedMetar>>,
    /// `None` entries record that a station has no TAF.
    tafs: MokaCache<Icao, Option<Arc<DecodedTaf>>>,
}

impl WeatherCache {
    pub fn new(config: &CacheConfig) -> Self {
        let metars = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let tafs = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { metars, tafs }
    }

    pub async fn get_metar(&self, icao: &Icao) -> Option<Arc<DecodedMetar>> {
        self.metars.get(icao).await
    }

    pub async fn insert_metar(&self, icao: Icao, metar: Arc<DecodedMetar>) {
        self.metars.insert(icao, metar).await;
    }

    pub async fn get_taf(&self, icao: &Icao) -> Option<Option<Arc<DecodedTaf>>> {
        self.tafs.get(icao).await
    }

    pub async fn insert_taf(&self, icao: Icao, taf: Option<Arc<DecodedTaf>>) {
        self.tafs.insert(icao, taf).await;
    }

    /// Approximate number of cached entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.metars.entry_count() + self.tafs.entry_count()
    }

    pub fn invalidate_all(&self) {
        self.metars.invalidate_all();
        self.tafs.invalidate_all();
    }
}

/// Weather source with caching.
///
/// Wraps any [`WeatherSource`] and serves repeat requests for a station from
/// memory until the TTL expires. Errors are never cached.
pub struct CachedWeatherSource<S> {
    inner: S,
    cache: WeatherCache,
}

impl<S: WeatherSource> CachedWeatherSource<S> {
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        Self {
            inner,
            cache: WeatherCache::new(config),
        }
    }

    /// Access the underlying source for operations that bypass the cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Access the cache (e.g. to clear it).
    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }
}

#[async_trait]
impl<S: WeatherSource> WeatherSource for CachedWeatherSource<S> {
    async fn metar(&self, icao: &Icao) -> Result<DecodedMetar, WeatherError> {
        if let Some(cached) = self.cache.get_metar(icao).await {
            debug!(%icao, "METAR cache hit");
            return Ok((*cached).clone());
        }

        let metar = self.inner.metar(icao).await?;
        self.cache.insert_metar(*icao, Arc::new(metar.clone())).await;
        Ok(metar)
    }

    async fn taf(&self, icao: &Icao) -> Result<Option<DecodedTaf>, WeatherError> {
        if let Some(cached) = self.cache.get_taf(icao).await {
            debug!(%icao, "TAF cache hit");
            return Ok(cached.map(|taf| (*taf).clone()));
        }

        let taf = self.inner.taf(icao).await?;
        self.cache
            .insert_taf(*icao, taf.clone().map(Arc::new))
            .await;
        Ok(taf)
    }
}
