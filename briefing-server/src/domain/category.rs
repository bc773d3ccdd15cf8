//! Flight categories and the trend between them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity classification of flying conditions.
///
/// Categories are ordered from least to most severe. The ordering is
/// significant: trends between forecast periods are computed by comparing
/// positions in [`FlightCategory::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlightCategory {
    Vfr,
    Mvfr,
    Ifr,
    Lifr,
}

impl FlightCategory {
    /// Canonical ordering, best conditions first.
    pub const ORDER: [FlightCategory; 4] = [
        FlightCategory::Vfr,
        FlightCategory::Mvfr,
        FlightCategory::Ifr,
        FlightCategory::Lifr,
    ];

    /// Position in [`Self::ORDER`]. Lower is better.
    pub fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|c| *c == self)
            .unwrap_or(Self::ORDER.len())
    }

    /// Short code, e.g. "MVFR".
    pub fn code(self) -> &'static str {
        match self {
            FlightCategory::Vfr => "VFR",
            FlightCategory::Mvfr => "MVFR",
            FlightCategory::Ifr => "IFR",
            FlightCategory::Lifr => "LIFR",
        }
    }

    /// Long label, e.g. "Marginal VFR".
    pub fn label(self) -> &'static str {
        match self {
            FlightCategory::Vfr => "Visual Flight Rules",
            FlightCategory::Mvfr => "Marginal VFR",
            FlightCategory::Ifr => "Instrument Flight Rules",
            FlightCategory::Lifr => "Low IFR",
        }
    }
}

impl fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Direction of change between two flight categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Deteriorating,
    Stable,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Deteriorating => "deteriorating",
            Trend::Stable => "stable",
        }
    }
}

/// Compare the transition from `from` to `to`.
///
/// # Examples
///
/// ```
/// use briefing_server::domain::{FlightCategory, Trend, trend};
///
/// assert_eq!(trend(FlightCategory::Vfr, FlightCategory::Ifr), Trend::Deteriorating);
/// assert_eq!(trend(FlightCategory::Lifr, FlightCategory::Mvfr), Trend::Improving);
/// assert_eq!(trend(FlightCategory::Ifr, FlightCategory::Ifr), Trend::Stable);
/// ```
pub fn trend(from: FlightCategory, to: FlightCategory) -> Trend {
    let (a, b) = (from.index(), to.index());
    if b > a {
        Trend::Deteriorating
    } else if b < a {
        Trend::Improving
    } else {
        Trend::Stable
    }
}

/// Trends across a chronological sequence of categories.
///
/// The first entry has no predecessor and therefore no trend.
pub fn sequence_trends<I>(categories: I) -> Vec<Option<Trend>>
where
    I: IntoIterator<Item = FlightCategory>,
{
    let mut previous: Option<FlightCategory> = None;
    categories
        .into_iter()
        .map(|current| {
            let t = previous.map(|prev| trend(prev, current));
            previous = Some(current);
            t
        })
        .collect()
}
