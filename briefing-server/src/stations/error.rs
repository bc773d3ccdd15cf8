//! Station directory error types.

use std::path::PathBuf;

use crate::domain::Icao;

/// Errors that can occur when loading a station directory.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Station file could not be read
    #[error("failed to read station file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Station list is not valid JSON or has invalid fields
    #[error("station list parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The same ICAO code appears twice
    #[error("duplicate station {0}")]
    DuplicateIcao(Icao),
}
