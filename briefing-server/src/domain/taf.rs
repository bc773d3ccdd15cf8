//! Decoded TAF (terminal aerodrome forecast).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::{FlightCategory, Icao, Sky, Trend, Visibility, Wind, sequence_trends};

/// TAF period qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PeriodKind {
    /// Initial forecast conditions
    Base,
    /// Rapid change from a point in time
    Fm,
    /// Gradual change over the window
    Becmg,
    /// Temporary fluctuations
    Tempo,
    Prob30,
    Prob40,
}

impl PeriodKind {
    pub fn code(self) -> &'static str {
        match self {
            PeriodKind::Base => "BASE",
            PeriodKind::Fm => "FM",
            PeriodKind::Becmg => "BECMG",
            PeriodKind::Tempo => "TEMPO",
            PeriodKind::Prob30 => "PROB30",
            PeriodKind::Prob40 => "PROB40",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodKind::Base => "Initial",
            PeriodKind::Fm => "From",
            PeriodKind::Becmg => "Becoming",
            PeriodKind::Tempo => "Temporary",
            PeriodKind::Prob30 => "Prob 30%",
            PeriodKind::Prob40 => "Prob 40%",
        }
    }

    /// TEMPO and PROB periods describe conditions that come and go, and may
    /// nest inside a BASE/FM/BECMG window.
    pub fn is_temporary(self) -> bool {
        matches!(
            self,
            PeriodKind::Tempo | PeriodKind::Prob30 | PeriodKind::Prob40
        )
    }

    /// Percentage carried by PROB kinds.
    pub fn probability(self) -> Option<u8> {
        match self {
            PeriodKind::Prob30 => Some(30),
            PeriodKind::Prob40 => Some(40),
            _ => None,
        }
    }
}

/// A half-open time window `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowRepr")]
pub struct ValidityWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct WindowRepr {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<WindowRepr> for ValidityWindow {
    type Error = DomainError;

    fn try_from(value: WindowRepr) -> Result<Self, Self::Error> {
        ValidityWindow::new(value.start, value.end)
    }
}

impl ValidityWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if start >= end {
            return Err(DomainError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `other` lies entirely within this window.
    pub fn contains(&self, other: &ValidityWindow) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    pub fn contains_instant(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

/// One forecast period within a TAF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TafPeriod {
    pub kind: PeriodKind,
    pub window: ValidityWindow,
    pub flight_category: FlightCategory,
    pub wind: Wind,
    pub visibility: Visibility,
    pub sky: Sky,
    pub weather: Vec<String>,
    /// Percentage for PROB30/PROB40. Filled in from the kind when omitted,
    /// and dropped on other kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<u8>,
}

impl TafPeriod {
    /// Convenience for `self.sky.ceiling()`.
    pub fn ceiling(&self) -> Option<u32> {
        self.sky.ceiling()
    }
}

/// A validated terminal aerodrome forecast.
///
/// Construction checks the structural invariants:
/// - at least one period, the first being BASE;
/// - periods sorted by start time;
/// - every period within the overall validity window;
/// - BASE/FM/BECMG periods do not overlap each other (TEMPO/PROB may nest);
/// - a probability on a PROB period matches its kind.
///
/// A PROB period without a probability takes it from its kind; any
/// probability on a non-PROB period is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TafRepr")]
pub struct DecodedTaf {
    icao: Icao,
    issued_at: DateTime<Utc>,
    validity: ValidityWindow,
    raw: String,
    periods: Vec<TafPeriod>,
}

#[derive(Deserialize)]
struct TafRepr {
    icao: Icao,
    issued_at: DateTime<Utc>,
    validity: ValidityWindow,
    raw: String,
    periods: Vec<TafPeriod>,
}

impl TryFrom<TafRepr> for DecodedTaf {
    type Error = DomainError;

    fn try_from(r: TafRepr) -> Result<Self, Self::Error> {
        DecodedTaf::new(r.icao, r.issued_at, r.validity, r.raw, r.periods)
    }
}

impl DecodedTaf {
    pub fn new(
        icao: Icao,
        issued_at: DateTime<Utc>,
        validity: ValidityWindow,
        raw: impl Into<String>,
        mut periods: Vec<TafPeriod>,
    ) -> Result<Self, DomainError> {
        normalize_probabilities(&mut periods)?;
        validate_periods(&validity, &periods)?;
        Ok(Self {
            icao,
            issued_at,
            validity,
            raw: raw.into(),
            periods,
        })
    }

    pub fn icao(&self) -> Icao {
        self.icao
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn validity(&self) -> &ValidityWindow {
        &self.validity
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Periods in chronological order, BASE first.
    pub fn periods(&self) -> &[TafPeriod] {
        &self.periods
    }

    /// Trend into each period from the one before it. The first is `None`.
    pub fn trends(&self) -> Vec<Option<Trend>> {
        period_trends(&self.periods)
    }
}

/// Pairwise trends across consecutive periods; the first has no predecessor.
pub fn period_trends(periods: &[TafPeriod]) -> Vec<Option<Trend>> {
    sequence_trends(periods.iter().map(|p| p.flight_category))
}

fn normalize_probabilities(periods: &mut [TafPeriod]) -> Result<(), DomainError> {
    for (i, period) in periods.iter_mut().enumerate() {
        match (period.kind.probability(), period.probability) {
            (Some(expected), Some(given)) if given != expected => {
                return Err(DomainError::ProbabilityMismatch(i));
            }
            (expected, _) => period.probability = expected,
        }
    }
    Ok(())
}

fn validate_periods(validity: &ValidityWindow, periods: &[TafPeriod]) -> Result<(), DomainError> {
    let first = periods.first().ok_or(DomainError::EmptyTaf)?;
    if first.kind != PeriodKind::Base {
        return Err(DomainError::FirstPeriodNotBase);
    }

    let mut previous_start: Option<DateTime<Utc>> = None;
    let mut persistent_end: Option<DateTime<Utc>> = None;

    for (i, period) in periods.iter().enumerate() {
        if previous_start.is_some_and(|prev| period.window.start() < prev) {
            return Err(DomainError::PeriodsOutOfOrder(i));
        }
        previous_start = Some(period.window.start());

        if !validity.contains(&period.window) {
            return Err(DomainError::PeriodOutsideValidity(i));
        }

        if !period.kind.is_temporary() {
            if persistent_end.is_some_and(|end| period.window.start() < end) {
                return Err(DomainError::OverlappingPeriods(i));
            }
            persistent_end = Some(period.window.end());
        }
    }

    Ok(())
}
