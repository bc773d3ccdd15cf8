//! Station directory.
//!
//! Provides list, free-text search, and nearby queries over a fixed set of
//! airport stations. Callers depend on the [`StationDirectory`] trait so a
//! remote directory can replace the in-memory one.

mod directory;
mod error;

pub use directory::{InMemoryDirectory, StationDirectory};
pub use error::StationError;
