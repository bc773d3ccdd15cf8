//! Askama templates for the web frontend.

use askama::Template;
use chrono::{DateTime, Utc};

use crate::briefing::{
    Briefing, BriefingOutcome, MetarAssessment, PeriodAssessment, StationSummary, WindStrength,
    phenomenon_label, wind_strength,
};
use crate::domain::{
    CloudLayer, FlightCategory, Severity, Station, TafPeriod, Trend, Visibility, Wind,
    WindDirection,
};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Dashboard page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub default_station: String,
    pub debounce_ms: u64,
    pub min_query_len: usize,
    pub nearby: Vec<StationView>,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Full briefing for one station.
#[derive(Template)]
#[template(path = "briefing.html")]
pub struct BriefingTemplate {
    pub briefing: BriefingView,
}

/// Station list fragment (search results or nearby shortcuts).
#[derive(Template)]
#[template(path = "station_list.html")]
pub struct StationListTemplate {
    pub stations: Vec<StationView>,
    pub seq: Option<u64>,
    pub empty_message: String,
}

/// Error fragment with a retry hint.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
    pub retry_icao: Option<String>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Badge sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeSize {
    Sm,
    Md,
    Lg,
}

impl BadgeSize {
    fn class(self) -> &'static str {
        match self {
            BadgeSize::Sm => "badge-sm",
            BadgeSize::Md => "badge-md",
            BadgeSize::Lg => "badge-lg",
        }
    }
}

/// The one flight-category badge: coloured dot plus code, optional label.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeView {
    pub code: &'static str,
    pub label: &'static str,
    pub show_label: bool,
    /// Full class list, e.g. `badge badge-mvfr badge-md`.
    pub class: String,
}

impl BadgeView {
    pub fn new(category: FlightCategory, size: BadgeSize, show_label: bool) -> Self {
        Self {
            code: category.code(),
            label: category.label(),
            show_label,
            class: format!(
                "badge badge-{} {}",
                category.code().to_ascii_lowercase(),
                size.class()
            ),
        }
    }
}

/// Visibility for display: `>10`, `<0.25`, or the plain value.
pub fn visibility_text(visibility: &Visibility) -> String {
    visibility.to_string()
}

/// Ceiling for display: `8,000 ft`, or `CLR` when there is none.
pub fn ceiling_text(ceiling_ft: Option<u32>) -> String {
    match ceiling_ft {
        Some(ft) => format!("{} ft", thousands(ft)),
        None => "CLR".to_string(),
    }
}

fn thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Wind direction for display: `Calm`, `Variable`, or `250°`.
pub fn wind_direction_text(wind: &Wind) -> String {
    if wind.is_calm() {
        return "Calm".to_string();
    }
    match wind.direction {
        WindDirection::Variable => "Variable".to_string(),
        WindDirection::Degrees(d) => format!("{d:03}°"),
    }
}

/// Wind speed with gust, e.g. `12G22 KT`. Empty when calm.
pub fn wind_speed_text(wind: &Wind) -> String {
    if wind.is_calm() {
        return String::new();
    }
    match wind.significant_gust() {
        Some(g) => format!("{}G{} {}", wind.speed, g, wind.unit.as_str()),
        None => format!("{} {}", wind.speed, wind.unit.as_str()),
    }
}

fn cloud_chips(layers: &[CloudLayer]) -> Vec<String> {
    layers.iter().map(ToString::to_string).collect()
}

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Normal => "sev-normal",
        Severity::Caution => "sev-caution",
        Severity::Warning => "sev-warning",
        Severity::Critical => "sev-critical",
    }
}

fn wind_class(strength: WindStrength) -> &'static str {
    match strength {
        WindStrength::Strong => "sev-critical",
        WindStrength::Moderate => "sev-caution",
        WindStrength::Calm | WindStrength::Light => "sev-normal",
    }
}

fn hhmm(t: DateTime<Utc>) -> String {
    t.format("%H:%M").to_string()
}

/// A present-weather code with its name.
#[derive(Debug, Clone, PartialEq)]
pub struct PhenomenonView {
    pub code: String,
    pub label: &'static str,
}

fn phenomena(codes: &[String]) -> Vec<PhenomenonView> {
    codes
        .iter()
        .map(|c| PhenomenonView {
            code: c.clone(),
            label: phenomenon_label(c),
        })
        .collect()
}

/// Wind cell.
#[derive(Debug, Clone, PartialEq)]
pub struct WindView {
    pub direction: String,
    pub speed: String,
    pub class: &'static str,
    /// Rotation for the direction arrow; `None` when calm or variable.
    pub arrow_degrees: Option<u16>,
}

impl WindView {
    pub fn new(wind: &Wind, strength: WindStrength) -> Self {
        let arrow_degrees = match (wind.is_calm(), wind.direction) {
            (false, WindDirection::Degrees(d)) => Some(d),
            _ => None,
        };
        Self {
            direction: wind_direction_text(wind),
            speed: wind_speed_text(wind),
            class: wind_class(strength),
            arrow_degrees,
        }
    }
}

/// Current conditions panel.
#[derive(Debug, Clone)]
pub struct MetarView {
    pub badge: BadgeView,
    pub observed: String,
    pub wind: WindView,
    pub visibility: String,
    pub visibility_class: &'static str,
    pub ceiling: String,
    pub ceiling_class: &'static str,
    pub clouds: Vec<String>,
    pub temperature: String,
    pub temperature_class: &'static str,
    /// "Fog risk (spread: N°)" when the spread is small.
    pub fog_note: Option<String>,
    pub altimeter: String,
    pub weather: Vec<PhenomenonView>,
    pub remarks: Option<String>,
    pub raw: String,
}

impl MetarView {
    pub fn new(briefing: &Briefing) -> Self {
        let metar = &briefing.metar;
        let a: &MetarAssessment = &briefing.assessment;

        Self {
            badge: BadgeView::new(metar.flight_category, BadgeSize::Lg, true),
            observed: format!("{} UTC", hhmm(metar.observed_at)),
            wind: WindView::new(&metar.wind, a.wind),
            visibility: visibility_text(&metar.visibility),
            visibility_class: severity_class(a.visibility),
            ceiling: ceiling_text(metar.ceiling()),
            ceiling_class: severity_class(a.ceiling),
            clouds: cloud_chips(metar.sky.layers()),
            temperature: format!("{}°C / {}°C", metar.temperature, metar.dewpoint),
            temperature_class: severity_class(a.temperature),
            fog_note: a
                .fog_risk
                .then(|| format!("Fog risk (spread: {}°)", a.spread)),
            altimeter: format!("{} {}", metar.altimeter.value, metar.altimeter.unit.as_str()),
            weather: phenomena(&metar.weather),
            remarks: metar.remarks.clone(),
            raw: metar.raw.clone(),
        }
    }
}

/// Trend tag on a period card.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendView {
    pub label: &'static str,
    pub class: &'static str,
}

impl TrendView {
    pub fn new(trend: Trend) -> Self {
        match trend {
            Trend::Improving => Self {
                label: "Improving",
                class: "trend-improving",
            },
            Trend::Deteriorating => Self {
                label: "Deteriorating",
                class: "trend-deteriorating",
            },
            Trend::Stable => Self {
                label: "Stable",
                class: "trend-stable",
            },
        }
    }
}

/// One TAF period card.
#[derive(Debug, Clone)]
pub struct PeriodView {
    /// e.g. "Becoming" or "Prob 40%"
    pub kind_label: &'static str,
    pub time_range: String,
    pub badge: BadgeView,
    /// `None` for the first period.
    pub trend: Option<TrendView>,
    pub temporary: bool,
    pub significant_weather: bool,
    pub wind: WindView,
    pub visibility: String,
    pub clouds: Vec<String>,
    pub weather: Vec<PhenomenonView>,
}

impl PeriodView {
    pub fn new(period: &TafPeriod, assessment: &PeriodAssessment) -> Self {
        Self {
            kind_label: period.kind.label(),
            time_range: format!(
                "{}–{}",
                hhmm(period.window.start()),
                hhmm(period.window.end())
            ),
            badge: BadgeView::new(period.flight_category, BadgeSize::Sm, false),
            trend: assessment.trend.map(TrendView::new),
            temporary: assessment.temporary,
            significant_weather: assessment.significant_weather,
            wind: WindView::new(&period.wind, wind_strength(&period.wind)),
            visibility: visibility_text(&period.visibility),
            clouds: cloud_chips(period.sky.layers()),
            weather: phenomena(&period.weather),
        }
    }
}

/// Forecast section.
#[derive(Debug, Clone)]
pub struct TafView {
    pub issued: String,
    pub validity: String,
    pub periods: Vec<PeriodView>,
    pub raw: String,
}

/// Whole briefing fragment.
#[derive(Debug, Clone)]
pub struct BriefingView {
    pub icao: String,
    pub station_name: Option<String>,
    pub location: Option<String>,
    pub metar: MetarView,
    pub taf: Option<TafView>,
    pub updated: String,
    pub stale: bool,
    pub stale_reason: Option<String>,
}

impl BriefingView {
    pub fn new(outcome: &BriefingOutcome) -> Self {
        let b = &outcome.briefing;

        let taf = b.taf.as_ref().map(|taf| TafView {
            issued: format!("{} UTC", hhmm(taf.issued_at())),
            validity: format!(
                "{} – {}",
                taf.validity().start().format("%d %b %H:%MZ"),
                taf.validity().end().format("%d %b %H:%MZ")
            ),
            periods: taf
                .periods()
                .iter()
                .zip(&b.periods)
                .map(|(p, a)| PeriodView::new(p, a))
                .collect(),
            raw: taf.raw().to_string(),
        });

        Self {
            icao: b.icao.to_string(),
            station_name: b.station.as_ref().map(|s| s.name.clone()),
            location: b
                .station
                .as_ref()
                .map(|s| format!("{}, {}", s.city, s.country)),
            metar: MetarView::new(b),
            taf,
            updated: b.updated_at.format("%H:%M:%S UTC").to_string(),
            stale: outcome.stale,
            stale_reason: outcome.error.clone(),
        }
    }
}

/// Station row in search results or the nearby list.
#[derive(Debug, Clone)]
pub struct StationView {
    pub icao: String,
    pub name: String,
    pub city: String,
    pub country: String,
    /// e.g. "32 km"
    pub distance: Option<String>,
    pub badge: Option<BadgeView>,
}

impl StationView {
    pub fn from_station(station: &Station) -> Self {
        Self {
            icao: station.icao.to_string(),
            name: station.name.clone(),
            city: station.city.clone(),
            country: station.country.clone(),
            distance: station.distance_km.map(|d| format!("{d:.0} km")),
            badge: None,
        }
    }

    pub fn from_summary(summary: &StationSummary) -> Self {
        Self {
            badge: summary
                .flight_category
                .map(|c| BadgeView::new(c, BadgeSize::Sm, false)),
            ..Self::from_station(&summary.station)
        }
    }
}
