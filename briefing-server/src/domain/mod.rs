//! Domain types for the weather briefing.
//!
//! This module contains the decoded report model and the pure derivation
//! logic (severity tiers, flight-category trends). All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod category;
mod conditions;
mod error;
mod icao;
mod metar;
mod severity;
mod station;
mod taf;

pub use category::{FlightCategory, Trend, sequence_trends, trend};
pub use conditions::{
    Altimeter, AltimeterUnit, CloudCoverage, CloudLayer, CloudType, METRES_PER_STATUTE_MILE, Sky,
    SpeedUnit, VariableRange, Visibility, VisibilityQualifier, VisibilityUnit, Wind,
    WindDirection,
};
pub use error::DomainError;
pub use icao::{Icao, InvalidIcao};
pub use metar::DecodedMetar;
pub use severity::{FOG_RISK_SPREAD, Severity, ceiling_severity, fog_risk, visibility_severity};
pub use station::{Position, Station};
pub use taf::{DecodedTaf, PeriodKind, TafPeriod, ValidityWindow, period_trends};
