//! Mock weather source for development without a backend.
//!
//! Serves four fixed METARs covering every flight category and one TAF, with
//! timestamps relative to the moment the source was built. Any other station
//! gets a synthetic METAR and no TAF.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::{
    Altimeter, CloudCoverage, CloudLayer, CloudType, DecodedMetar, DecodedTaf, FlightCategory,
    Icao, PeriodKind, Sky, TafPeriod, ValidityWindow, Visibility, VisibilityQualifier, Wind,
    WindDirection,
};

use super::error::WeatherError;
use super::source::WeatherSource;
use super::synthetic::SyntheticMetars;

/// Mock source that serves a built-in dataset.
#[derive(Debug)]
pub struct MockWeatherSource {
    metars: HashMap<Icao, DecodedMetar>,
    tafs: HashMap<Icao, DecodedTaf>,
    synthetic: SyntheticMetars,
    latency: Option<Duration>,
}

impl MockWeatherSource {
    /// Build the dataset anchored at `now`.
    pub fn new(now: DateTime<Utc>) -> Result<Self, WeatherError> {
        Self::with_synthetic(now, SyntheticMetars::new())
    }

    /// Build the dataset with a specific synthetic generator (e.g. seeded).
    pub fn with_synthetic(
        now: DateTime<Utc>,
        synthetic: SyntheticMetars,
    ) -> Result<Self, WeatherError> {
        let metars = mock_metars(now)?
            .into_iter()
            .map(|m| (m.icao, m))
            .collect();

        let taf = ebbr_taf(now)?;
        let tafs = HashMap::from([(taf.icao(), taf)]);

        Ok(Self {
            metars,
            tafs,
            synthetic,
            latency: None,
        })
    }

    /// Delay every fetch, to mimic a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Stations with a recorded METAR.
    pub fn known_stations(&self) -> Vec<Icao> {
        let mut codes: Vec<Icao> = self.metars.keys().copied().collect();
        codes.sort();
        codes
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl WeatherSource for MockWeatherSource {
    async fn metar(&self, icao: &Icao) -> Result<DecodedMetar, WeatherError> {
        self.simulate_latency().await;

        match self.metars.get(icao) {
            Some(metar) => {
                debug!(%icao, "serving mock METAR");
                Ok(metar.clone())
            }
            None => {
                warn!(%icao, "no METAR on record, generating synthetic observation");
                Ok(self.synthetic.generate(*icao, Utc::now()))
            }
        }
    }

    async fn taf(&self, icao: &Icao) -> Result<Option<DecodedTaf>, WeatherError> {
        self.simulate_latency().await;
        Ok(self.tafs.get(icao).cloned())
    }
}

fn invalid_dataset(e: impl std::fmt::Display) -> WeatherError {
    WeatherError::Malformed {
        message: format!("built-in dataset is invalid: {e}"),
        body: None,
    }
}

fn code(s: &str) -> Result<Icao, WeatherError> {
    Icao::parse(s).map_err(invalid_dataset)
}

fn mock_metars(now: DateTime<Utc>) -> Result<Vec<DecodedMetar>, WeatherError> {
    Ok(vec![
        DecodedMetar {
            icao: code("EBBR")?,
            observed_at: now,
            raw: "EBBR 131150Z 25012G22KT 9999 FEW035 SCT045 BKN080 18/12 Q1018 NOSIG".into(),
            flight_category: FlightCategory::Vfr,
            wind: Wind::knots(WindDirection::Degrees(250), 12).with_gust(22),
            visibility: Visibility::statute_miles(10.0)
                .with_qualifier(VisibilityQualifier::MoreThan),
            sky: Sky::new(vec![
                CloudLayer::new(CloudCoverage::Few, 3500),
                CloudLayer::new(CloudCoverage::Sct, 4500),
                CloudLayer::new(CloudCoverage::Bkn, 8000),
            ]),
            weather: Vec::new(),
            temperature: 18.0,
            dewpoint: 12.0,
            altimeter: Altimeter::hectopascals(1018.0),
            remarks: None,
        },
        DecodedMetar {
            icao: code("EBAW")?,
            observed_at: now,
            raw: "EBAW 131150Z 27008KT 5000 -RA BR SCT008 BKN015 OVC025 14/13 Q1016".into(),
            flight_category: FlightCategory::Mvfr,
            wind: Wind::knots(WindDirection::Degrees(270), 8),
            visibility: Visibility::statute_miles(3.0),
            sky: Sky::new(vec![
                CloudLayer::new(CloudCoverage::Sct, 800),
                CloudLayer::new(CloudCoverage::Bkn, 1500),
                CloudLayer::new(CloudCoverage::Ovc, 2500),
            ]),
            weather: vec!["-RA".into(), "BR".into()],
            temperature: 14.0,
            dewpoint: 13.0,
            altimeter: Altimeter::hectopascals(1016.0),
            remarks: None,
        },
        DecodedMetar {
            icao: code("EHAM")?,
            observed_at: now,
            raw: "EHAM 131150Z 31015G28KT 2000 +TSRA BKN005 OVC010CB 12/11 Q1012 TEMPO 0800 +TSRA"
                .into(),
            flight_category: FlightCategory::Ifr,
            wind: Wind::knots(WindDirection::Degrees(310), 15).with_gust(28),
            visibility: Visibility::statute_miles(1.25),
            sky: Sky::new(vec![
                CloudLayer::new(CloudCoverage::Bkn, 500),
                CloudLayer::new(CloudCoverage::Ovc, 1000).with_type(CloudType::Cb),
            ]),
            weather: vec!["+TSRA".into()],
            temperature: 12.0,
            dewpoint: 11.0,
            altimeter: Altimeter::hectopascals(1012.0),
            remarks: None,
        },
        DecodedMetar {
            icao: code("LFPG")?,
            observed_at: now,
            raw: "LFPG 131150Z 00000KT 0200 FG VV001 08/08 Q1020".into(),
            flight_category: FlightCategory::Lifr,
            wind: Wind::knots(WindDirection::Degrees(0), 0),
            visibility: Visibility::statute_miles(0.125),
            // Vertical visibility 100 ft acts as an overcast ceiling
            sky: Sky::new(vec![CloudLayer::new(CloudCoverage::Ovc, 100)]),
            weather: vec!["FG".into()],
            temperature: 8.0,
            dewpoint: 8.0,
            altimeter: Altimeter::hectopascals(1020.0),
            remarks: Some("VV001".into()),
        },
    ])
}

fn window(now: DateTime<Utc>, from_h: i64, to_h: i64) -> Result<ValidityWindow, WeatherError> {
    ValidityWindow::new(
        now + chrono::Duration::hours(from_h),
        now + chrono::Duration::hours(to_h),
    )
    .map_err(invalid_dataset)
}

const EBBR_TAF_RAW: &str = "TAF EBBR 131100Z 1312/1412 25012G22KT 9999 FEW035 SCT045
  TEMPO 1314/1318 4000 SHRA BKN020
  BECMG 1318/1320 18008KT 9999 SCT040
  FM140200 VRB03KT 3000 BR BKN008
  PROB40 TEMPO 1404/1408 0800 FG VV002";

fn ebbr_taf(now: DateTime<Utc>) -> Result<DecodedTaf, WeatherError> {
    let gusty = Wind::knots(WindDirection::Degrees(250), 12).with_gust(22);
    let light_variable = Wind::knots(WindDirection::Variable, 3);

    let periods = vec![
        TafPeriod {
            kind: PeriodKind::Base,
            window: window(now, 0, 2)?,
            flight_category: FlightCategory::Vfr,
            wind: gusty.clone(),
            visibility: Visibility::statute_miles(10.0),
            sky: Sky::new(vec![
                CloudLayer::new(CloudCoverage::Few, 3500),
                CloudLayer::new(CloudCoverage::Sct, 4500),
            ]),
            weather: Vec::new(),
            probability: None,
        },
        TafPeriod {
            kind: PeriodKind::Tempo,
            window: window(now, 2, 6)?,
            flight_category: FlightCategory::Mvfr,
            wind: gusty,
            visibility: Visibility::statute_miles(2.5),
            sky: Sky::new(vec![CloudLayer::new(CloudCoverage::Bkn, 2000)]),
            weather: vec!["SHRA".into()],
            probability: None,
        },
        TafPeriod {
            kind: PeriodKind::Becmg,
            window: window(now, 6, 8)?,
            flight_category: FlightCategory::Vfr,
            wind: Wind::knots(WindDirection::Degrees(180), 8),
            visibility: Visibility::statute_miles(10.0),
            sky: Sky::new(vec![CloudLayer::new(CloudCoverage::Sct, 4000)]),
            weather: Vec::new(),
            probability: None,
        },
        TafPeriod {
            kind: PeriodKind::Fm,
            window: window(now, 14, 20)?,
            flight_category: FlightCategory::Ifr,
            wind: light_variable.clone(),
            visibility: Visibility::statute_miles(1.9),
            sky: Sky::new(vec![CloudLayer::new(CloudCoverage::Bkn, 800)]),
            weather: vec!["BR".into()],
            probability: None,
        },
        TafPeriod {
            kind: PeriodKind::Prob40,
            window: window(now, 16, 20)?,
            flight_category: FlightCategory::Lifr,
            wind: light_variable,
            visibility: Visibility::statute_miles(0.5),
            // VV002
            sky: Sky::new(vec![CloudLayer::new(CloudCoverage::Ovc, 200)]),
            weather: vec!["FG".into()],
            probability: Some(40),
        },
    ];

    DecodedTaf::new(code("EBBR")?, now, window(now, 0, 24)?, EBBR_TAF_RAW, periods)
        .map_err(invalid_dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Severity, Trend, ceiling_severity, fog_risk, visibility_severity};
    use chrono::TimeZone;
    use std::time::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 13, 11, 50, 0).unwrap()
    }

    fn source() -> MockWeatherSource {
        MockWeatherSource::with_synthetic(now(), SyntheticMetars::seeded(1)).unwrap()
    }

    fn icao(s: &str) -> Icao {
        Icao::parse(s).unwrap()
    }

    #[test]
    fn dataset_covers_every_category() {
        let src = source();
        assert_eq!(
            src.known_stations(),
            vec![icao("EBAW"), icao("EBBR"), icao("EHAM"), icao("LFPG")]
        );
        let mut categories: Vec<_> = src.metars.values().map(|m| m.flight_category).collect();
        categories.sort_by_key(|c| c.index());
        assert_eq!(categories, FlightCategory::ORDER.to_vec());
    }

    #[tokio::test]
    async fn brussels_is_benign() {
        let metar = source().metar(&icao("EBBR")).await.unwrap();

        assert_eq!(metar.flight_category, FlightCategory::Vfr);
        assert_eq!(metar.ceiling(), Some(8000));
        assert_eq!(
            visibility_severity(metar.visibility.in_statute_miles()),
            Severity::Normal
        );
        assert_eq!(ceiling_severity(metar.ceiling()), Severity::Normal);
        assert!(!fog_risk(metar.temperature, metar.dewpoint));
    }

    #[tokio::test]
    async fn amsterdam_is_marginal_with_fog_risk() {
        let metar = source().metar(&icao("EHAM")).await.unwrap();

        assert_eq!(metar.flight_category, FlightCategory::Ifr);
        assert_eq!(metar.ceiling(), Some(500));
        assert_eq!(
            visibility_severity(metar.visibility.in_statute_miles()),
            Severity::Warning
        );
        assert_eq!(ceiling_severity(metar.ceiling()), Severity::Warning);
        assert!(fog_risk(metar.temperature, metar.dewpoint));
        assert_eq!(metar.sky.layers()[1].to_string(), "OVC010 CB");
    }

    #[tokio::test]
    async fn paris_vertical_visibility_is_ceiling() {
        let metar = source().metar(&icao("LFPG")).await.unwrap();
        assert_eq!(metar.ceiling(), Some(100));
        assert!(metar.wind.is_calm());
        assert_eq!(metar.remarks.as_deref(), Some("VV001"));
    }

    #[tokio::test]
    async fn unknown_station_gets_synthetic_metar() {
        let src = source();
        let metar = src.metar(&icao("ZZZZ")).await.unwrap();

        assert_eq!(metar.icao, icao("ZZZZ"));
        assert!(matches!(
            metar.flight_category,
            FlightCategory::Vfr | FlightCategory::Mvfr
        ));
        assert!(metar.raw.starts_with("ZZZZ "));
        assert!(src.taf(&icao("ZZZZ")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn brussels_taf_timeline() {
        let taf = source().taf(&icao("EBBR")).await.unwrap().unwrap();

        let kinds: Vec<_> = taf.periods().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PeriodKind::Base,
                PeriodKind::Tempo,
                PeriodKind::Becmg,
                PeriodKind::Fm,
                PeriodKind::Prob40
            ]
        );
        assert_eq!(
            taf.trends(),
            vec![
                None,
                Some(Trend::Deteriorating),
                Some(Trend::Improving),
                Some(Trend::Deteriorating),
                Some(Trend::Deteriorating),
            ]
        );
        assert_eq!(taf.validity().start(), now());
        assert_eq!(taf.validity().end(), now() + chrono::Duration::hours(24));
        assert_eq!(taf.periods()[4].ceiling(), Some(200));
        assert!(taf.raw().starts_with("TAF EBBR"));
    }

    #[tokio::test]
    async fn only_brussels_has_taf() {
        let src = source();
        for code in ["EBAW", "EHAM", "LFPG"] {
            assert!(src.taf(&icao(code)).await.unwrap().is_none());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn combined_fetch_runs_concurrently() {
        let src = source().with_latency(Duration::from_millis(400));
        let started = tokio::time::Instant::now();

        let report = src.weather(&icao("EBBR")).await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_millis(400));
        assert_eq!(report.metar.icao, icao("EBBR"));
        assert!(report.taf.is_some());
    }

    #[tokio::test]
    async fn combined_fetch_for_unknown_station() {
        let report = source().weather(&icao("KSFO")).await.unwrap();
        assert_eq!(report.metar.icao, icao("KSFO"));
        assert!(report.taf.is_none());
    }
}
