//! Severity tiers for observed values.
//!
//! These tiers drive visual emphasis only. They are not a regulatory
//! flight-category calculation.

use serde::{Deserialize, Serialize};

/// Visual emphasis tier, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Caution,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Caution => "caution",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

/// Visibility thresholds in statute miles, checked best tier first.
const VISIBILITY_TIERS: [(f64, Severity); 3] = [
    (5.0, Severity::Normal),
    (3.0, Severity::Caution),
    (1.0, Severity::Warning),
];

/// Ceiling thresholds in feet, checked best tier first.
const CEILING_TIERS: [(u32, Severity); 3] = [
    (3000, Severity::Normal),
    (1000, Severity::Caution),
    (500, Severity::Warning),
];

/// Maximum temperature/dewpoint spread (°C) still flagged as a fog risk.
pub const FOG_RISK_SPREAD: f64 = 3.0;

/// Classify visibility in statute miles.
///
/// A value exactly on a boundary belongs to the less severe tier.
pub fn visibility_severity(statute_miles: f64) -> Severity {
    VISIBILITY_TIERS
        .iter()
        .find(|(min, _)| statute_miles >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(Severity::Critical)
}

/// Classify a ceiling in feet. No ceiling means unlimited, the safe case.
pub fn ceiling_severity(ceiling_ft: Option<u32>) -> Severity {
    let Some(ceiling) = ceiling_ft else {
        return Severity::Normal;
    };
    CEILING_TIERS
        .iter()
        .find(|(min, _)| ceiling >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(Severity::Critical)
}

/// Product heuristic for saturation: a small temperature/dewpoint spread.
///
/// This is a proxy used to draw attention, not a dew-point depression model.
pub fn fog_risk(temperature_c: f64, dewpoint_c: f64) -> bool {
    temperature_c - dewpoint_c <= FOG_RISK_SPREAD
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Better visibility never means more severe.
        #[test]
        fn visibility_monotonic(a in -10.0f64..50.0, b in -10.0f64..50.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(visibility_severity(hi) <= visibility_severity(lo));
        }

        /// A higher ceiling never means more severe.
        #[test]
        fn ceiling_monotonic(a in 0u32..20_000, b in 0u32..20_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ceiling_severity(Some(hi)) <= ceiling_severity(Some(lo)));
        }

        #[test]
        fn fog_risk_matches_spread(t in -40i32..45, d in -40i32..45) {
            prop_assert_eq!(fog_risk(t as f64, d as f64), t - d <= 3);
        }
    }
}
