//! Domain error types.
//!
//! These errors represent validation failures in decoded reports. They are
//! distinct from API/IO errors.

use chrono::{DateTime, Utc};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Validity window does not move forward in time
    #[error("validity window must start before it ends ({start} >= {end})")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// TAF has no periods
    #[error("TAF must have at least one period")]
    EmptyTaf,

    /// First TAF period is not the base forecast
    #[error("first TAF period must be BASE")]
    FirstPeriodNotBase,

    /// Periods are not in chronological order
    #[error("TAF period {0} starts before the period preceding it")]
    PeriodsOutOfOrder(usize),

    /// Period extends past the TAF's overall validity
    #[error("TAF period {0} falls outside the forecast validity")]
    PeriodOutsideValidity(usize),

    /// Two non-temporary periods cover the same time
    #[error("TAF period {0} overlaps an earlier BASE/FM/BECMG period")]
    OverlappingPeriods(usize),

    /// PROB period carries a probability other than its own
    #[error("TAF period {0} has a probability that does not match its kind")]
    ProbabilityMismatch(usize),
}
