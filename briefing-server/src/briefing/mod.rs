//! Briefing assembly.
//!
//! Turns weather source output into what the dashboard displays: severity
//! tiers for the current conditions, trend and warning tags for each TAF
//! period, and nearby-station summaries. [`BriefingService`] also keeps the
//! last good briefing per station for stale fallback.

mod assess;
mod service;

pub use assess::{
    MetarAssessment, PeriodAssessment, WindStrength, assess_periods, is_significant,
    phenomenon_label, wind_strength,
};
pub use service::{Briefing, BriefingOutcome, BriefingService, StationSummary};
