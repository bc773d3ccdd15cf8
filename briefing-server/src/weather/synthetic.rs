//! Synthetic METARs for stations without real data.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{
    Altimeter, CloudCoverage, CloudLayer, DecodedMetar, FlightCategory, Icao, Sky, Visibility,
    VisibilityQualifier, Wind, WindDirection,
};

/// Build a benign placeholder observation for `icao`.
///
/// The category is VFR or MVFR with equal probability, never worse. All
/// other elements are fixed.
pub fn synthetic_metar<R: Rng + ?Sized>(
    icao: Icao,
    now: DateTime<Utc>,
    rng: &mut R,
) -> DecodedMetar {
    let flight_category = if rng.gen_bool(0.5) {
        FlightCategory::Vfr
    } else {
        FlightCategory::Mvfr
    };

    DecodedMetar {
        icao,
        observed_at: now,
        raw: format!(
            "{} {}Z 27010KT 9999 FEW040 22/15 Q1015",
            icao,
            now.format("%d%H%M")
        ),
        flight_category,
        wind: Wind::knots(WindDirection::Degrees(270), 10),
        visibility: Visibility::statute_miles(10.0).with_qualifier(VisibilityQualifier::MoreThan),
        sky: Sky::new(vec![CloudLayer::new(CloudCoverage::Few, 4000)]),
        weather: Vec::new(),
        temperature: 22.0,
        dewpoint: 15.0,
        altimeter: Altimeter::hectopascals(1015.0),
        remarks: None,
    }
}

/// Shared generator that owns its random source.
///
/// Seed it in tests for reproducible categories.
#[derive(Debug)]
pub struct SyntheticMetars {
    rng: Mutex<StdRng>,
}

impl SyntheticMetars {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn generate(&self, icao: Icao, now: DateTime<Utc>) -> DecodedMetar {
        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        synthetic_metar(icao, now, &mut *rng)
    }
}

impl Default for SyntheticMetars {
    fn default() -> Self {
        Self::new()
    }
}
