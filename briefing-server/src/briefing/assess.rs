//! Display-ready assessments of decoded reports.
//!
//! Everything here is a pure function of a METAR or TAF: severity tiers for
//! each data cell, wind strength, and per-period trend and warning flags.

use serde::Serialize;

use crate::domain::{
    DecodedMetar, DecodedTaf, FlightCategory, Severity, TafPeriod, Trend, Wind, ceiling_severity,
    fog_risk, visibility_severity,
};

/// How strongly the wind should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindStrength {
    Calm,
    Light,
    Moderate,
    Strong,
}

impl WindStrength {
    pub fn as_str(self) -> &'static str {
        match self {
            WindStrength::Calm => "calm",
            WindStrength::Light => "light",
            WindStrength::Moderate => "moderate",
            WindStrength::Strong => "strong",
        }
    }
}

/// Classify a wind by mean speed and gust.
///
/// Strong at 20 kt mean or 30 kt gust, moderate at 12 kt mean or 20 kt gust.
pub fn wind_strength(wind: &Wind) -> WindStrength {
    let gust = wind.gust.unwrap_or(0);
    if wind.is_calm() {
        WindStrength::Calm
    } else if wind.speed >= 20 || gust >= 30 {
        WindStrength::Strong
    } else if wind.speed >= 12 || gust >= 20 {
        WindStrength::Moderate
    } else {
        WindStrength::Light
    }
}

/// Severity tags for the current-conditions panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetarAssessment {
    pub visibility: Severity,
    pub ceiling: Severity,
    /// Caution when fog is likely, otherwise Normal.
    pub temperature: Severity,
    pub fog_risk: bool,
    /// Temperature minus dewpoint, °C.
    pub spread: f64,
    pub wind: WindStrength,
}

impl MetarAssessment {
    pub fn of(metar: &DecodedMetar) -> Self {
        let fog = fog_risk(metar.temperature, metar.dewpoint);
        Self {
            visibility: visibility_severity(metar.visibility.in_statute_miles()),
            ceiling: ceiling_severity(metar.ceiling()),
            temperature: if fog {
                Severity::Caution
            } else {
                Severity::Normal
            },
            fog_risk: fog,
            spread: metar.spread(),
            wind: wind_strength(&metar.wind),
        }
    }

    /// Worst tier across all cells.
    pub fn worst(&self) -> Severity {
        self.visibility.max(self.ceiling).max(self.temperature)
    }
}

/// Tags for one TAF period card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodAssessment {
    /// Change from the previous period; `None` for the first.
    pub trend: Option<Trend>,
    /// TEMPO/PROB periods render dashed.
    pub temporary: bool,
    pub significant_weather: bool,
}

/// A period deserves a warning when it is LIFR or forecasts thunderstorms.
pub fn is_significant(period: &TafPeriod) -> bool {
    period.flight_category == FlightCategory::Lifr
        || period.weather.iter().any(|w| w.contains("TS"))
}

/// Assess every period of a TAF, in order.
pub fn assess_periods(taf: &DecodedTaf) -> Vec<PeriodAssessment> {
    taf.periods()
        .iter()
        .zip(taf.trends())
        .map(|(period, trend)| PeriodAssessment {
            trend,
            temporary: period.kind.is_temporary(),
            significant_weather: is_significant(period),
        })
        .collect()
}

/// Human-readable name for a present-weather code.
pub fn phenomenon_label(code: &str) -> &'static str {
    match code {
        "RA" => "Rain",
        "-RA" => "Light Rain",
        "+RA" => "Heavy Rain",
        "SHRA" => "Rain Showers",
        "DZ" => "Drizzle",
        "SN" => "Snow",
        "-SN" => "Light Snow",
        "+SN" => "Heavy Snow",
        "TS" => "Thunderstorm",
        "TSRA" => "Thunderstorm + Rain",
        "+TSRA" => "Heavy T-Storm",
        "FG" => "Fog",
        "BR" => "Mist",
        "HZ" => "Haze",
        "FU" => "Smoke",
        "VA" => "Volcanic Ash",
        "GR" => "Hail",
        "FC" => "Funnel Cloud",
        _ => "Weather",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Icao, WindDirection};
    use crate::weather::{MockWeatherSource, WeatherSource};
    use chrono::Utc;

    async fn metar(code: &str) -> DecodedMetar {
        let source = MockWeatherSource::new(Utc::now()).unwrap();
        source.metar(&Icao::parse(code).unwrap()).await.unwrap()
    }

    #[test]
    fn wind_tiers() {
        let calm = Wind::knots(WindDirection::Degrees(0), 0);
        assert_eq!(wind_strength(&calm), WindStrength::Calm);

        let light = Wind::knots(WindDirection::Degrees(270), 8);
        assert_eq!(wind_strength(&light), WindStrength::Light);

        let moderate = Wind::knots(WindDirection::Degrees(270), 12);
        assert_eq!(wind_strength(&moderate), WindStrength::Moderate);

        let gusty = Wind::knots(WindDirection::Degrees(270), 8).with_gust(20);
        assert_eq!(wind_strength(&gusty), WindStrength::Moderate);

        let strong = Wind::knots(WindDirection::Variable, 20);
        assert_eq!(wind_strength(&strong), WindStrength::Strong);

        let strong_gust = Wind::knots(WindDirection::Degrees(310), 15).with_gust(30);
        assert_eq!(wind_strength(&strong_gust), WindStrength::Strong);
    }

    #[tokio::test]
    async fn brussels_assessment() {
        let a = MetarAssessment::of(&metar("EBBR").await);
        assert_eq!(a.visibility, Severity::Normal);
        assert_eq!(a.ceiling, Severity::Normal);
        assert!(!a.fog_risk);
        assert_eq!(a.spread, 6.0);
        assert_eq!(a.temperature, Severity::Normal);
        assert_eq!(a.wind, WindStrength::Moderate);
        assert_eq!(a.worst(), Severity::Normal);
    }

    #[tokio::test]
    async fn amsterdam_assessment() {
        let a = MetarAssessment::of(&metar("EHAM").await);
        assert_eq!(a.visibility, Severity::Warning);
        assert_eq!(a.ceiling, Severity::Warning);
        assert!(a.fog_risk);
        assert_eq!(a.temperature, Severity::Caution);
        assert_eq!(a.wind, WindStrength::Moderate);
        assert_eq!(a.worst(), Severity::Warning);
    }

    #[tokio::test]
    async fn paris_assessment() {
        let a = MetarAssessment::of(&metar("LFPG").await);
        assert_eq!(a.visibility, Severity::Critical);
        assert_eq!(a.ceiling, Severity::Critical);
        assert_eq!(a.spread, 0.0);
        assert_eq!(a.wind, WindStrength::Calm);
    }

    #[tokio::test]
    async fn brussels_periods() {
        let source = MockWeatherSource::new(Utc::now()).unwrap();
        let taf = source
            .taf(&Icao::parse("EBBR").unwrap())
            .await
            .unwrap()
            .unwrap();

        let periods = assess_periods(&taf);
        assert_eq!(periods.len(), 5);

        assert_eq!(periods[0].trend, None);
        assert_eq!(periods[1].trend, Some(Trend::Deteriorating));
        assert_eq!(periods[2].trend, Some(Trend::Improving));

        let temporary: Vec<bool> = periods.iter().map(|p| p.temporary).collect();
        assert_eq!(temporary, vec![false, true, false, false, true]);

        // Only the PROB40 fog period is LIFR
        let significant: Vec<bool> = periods.iter().map(|p| p.significant_weather).collect();
        assert_eq!(significant, vec![false, false, false, false, true]);
    }

    #[test]
    fn phenomenon_labels() {
        assert_eq!(phenomenon_label("-RA"), "Light Rain");
        assert_eq!(phenomenon_label("+TSRA"), "Heavy T-Storm");
        assert_eq!(phenomenon_label("BR"), "Mist");
        assert_eq!(phenomenon_label("FC"), "Funnel Cloud");
        assert_eq!(phenomenon_label("SQ"), "Weather");
    }
}
