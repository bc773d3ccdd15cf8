//! Debounced station search.
//!
//! Every keystroke starts a search with a fresh sequence number. A search
//! waits out the debounce window, and its result is dropped if a newer search
//! has started in the meantime, so an out-of-order response can never
//! overwrite the results of a later query.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::domain::Station;
use crate::stations::StationDirectory;

/// Default debounce window.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Queries shorter than this (after trimming) return no results.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone)]
pub struct DebounceConfig {
    /// Quiet period before a query runs.
    pub delay: Duration,
    /// Minimum trimmed query length, in characters.
    pub min_query_len: usize,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }
}

impl DebounceConfig {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_min_query_len(mut self, len: usize) -> Self {
        self.min_query_len = len;
        self
    }

    /// The trimmed query if it is long enough to search for.
    pub fn accept<'q>(&self, query: &'q str) -> Option<&'q str> {
        let trimmed = query.trim();
        (trimmed.chars().count() >= self.min_query_len).then_some(trimmed)
    }
}

/// Results of one search, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub seq: u64,
    pub stations: Vec<Station>,
}

/// Station search that only ever delivers the latest query's results.
///
/// The sequence counter belongs to one search box: create one instance per
/// client session. Instances shared between clients would let one client's
/// typing supersede another's searches. The HTTP endpoint does not hold one;
/// browsers echo their own `seq` instead.
pub struct DebouncedSearch {
    directory: Arc<dyn StationDirectory>,
    config: DebounceConfig,
    latest: AtomicU64,
}

impl DebouncedSearch {
    pub fn new(directory: Arc<dyn StationDirectory>, config: DebounceConfig) -> Self {
        Self {
            directory,
            config,
            latest: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Sequence number of the most recently started search.
    pub fn latest_seq(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Run a debounced search.
    ///
    /// Returns `None` if another search started before this one finished.
    /// A too-short query resolves immediately with no stations, and still
    /// supersedes any search in flight.
    pub async fn search(&self, query: &str) -> Option<SearchResults> {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(needle) = self.config.accept(query) else {
            return Some(SearchResults {
                seq,
                stations: Vec::new(),
            });
        };

        tokio::time::sleep(self.config.delay).await;
        if !self.is_latest(seq) {
            debug!(seq, query = needle, "search superseded during debounce");
            return None;
        }

        let stations = self.directory.search(needle);

        // A newer search may have started while this one ran
        if !self.is_latest(seq) {
            debug!(seq, query = needle, "dropping stale search results");
            return None;
        }

        Some(SearchResults { seq, stations })
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }
}
