//! Observed or forecast weather elements shared by METARs and TAF periods.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Statute miles to metres.
pub const METRES_PER_STATUTE_MILE: f64 = 1609.344;

// ============================================================================
// Wind
// ============================================================================

/// Wind direction: a true bearing or variable ("VRB").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindDirectionRepr", into = "WindDirectionRepr")]
pub enum WindDirection {
    Degrees(u16),
    Variable,
}

/// Wire shape: a number, or the string "VRB".
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WindDirectionRepr {
    Degrees(u16),
    Code(String),
}

impl TryFrom<WindDirectionRepr> for WindDirection {
    type Error = String;

    fn try_from(value: WindDirectionRepr) -> Result<Self, Self::Error> {
        match value {
            WindDirectionRepr::Degrees(d) if d <= 360 => Ok(WindDirection::Degrees(d)),
            WindDirectionRepr::Degrees(d) => Err(format!("wind direction out of range: {d}")),
            WindDirectionRepr::Code(s) if s == "VRB" => Ok(WindDirection::Variable),
            WindDirectionRepr::Code(s) => Err(format!("unknown wind direction: {s}")),
        }
    }
}

impl From<WindDirection> for WindDirectionRepr {
    fn from(value: WindDirection) -> Self {
        match value {
            WindDirection::Degrees(d) => WindDirectionRepr::Degrees(d),
            WindDirection::Variable => WindDirectionRepr::Code("VRB".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[serde(rename = "KT")]
    Knots,
    #[serde(rename = "MPS")]
    MetresPerSecond,
}

impl SpeedUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            SpeedUnit::Knots => "KT",
            SpeedUnit::MetresPerSecond => "MPS",
        }
    }
}

/// Range over which a direction varies, e.g. `200V250`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRange {
    pub from: u16,
    pub to: u16,
}

/// Surface wind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub direction: WindDirection,
    pub speed: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gust: Option<u16>,
    pub unit: SpeedUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<VariableRange>,
}

impl Wind {
    /// Steady wind in knots with no gust.
    pub fn knots(direction: WindDirection, speed: u16) -> Self {
        Self {
            direction,
            speed,
            gust: None,
            unit: SpeedUnit::Knots,
            variable: None,
        }
    }

    pub fn with_gust(mut self, gust: u16) -> Self {
        self.gust = Some(gust);
        self
    }

    pub fn is_calm(&self) -> bool {
        self.speed == 0
    }

    /// Gust worth reporting: only when it exceeds the mean speed.
    pub fn significant_gust(&self) -> Option<u16> {
        self.gust.filter(|g| *g > self.speed)
    }
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            WindDirection::Degrees(d) => write!(f, "{d:03}")?,
            WindDirection::Variable => f.write_str("VRB")?,
        }
        write!(f, "{:02}", self.speed)?;
        if let Some(g) = self.gust {
            write!(f, "G{g:02}")?;
        }
        f.write_str(self.unit.as_str())
    }
}

// ============================================================================
// Visibility
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityUnit {
    #[serde(rename = "SM")]
    StatuteMiles,
    #[serde(rename = "M")]
    Metres,
}

impl VisibilityUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            VisibilityUnit::StatuteMiles => "SM",
            VisibilityUnit::Metres => "M",
        }
    }
}

/// Reported bound on the visibility value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityQualifier {
    /// "M": less than the value.
    #[serde(rename = "M")]
    LessThan,
    /// "P": more than the value.
    #[serde(rename = "P")]
    MoreThan,
}

/// Prevailing visibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visibility {
    pub value: f64,
    pub unit: VisibilityUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<VisibilityQualifier>,
}

impl Visibility {
    pub fn statute_miles(value: f64) -> Self {
        Self {
            value,
            unit: VisibilityUnit::StatuteMiles,
            qualifier: None,
        }
    }

    pub fn with_qualifier(mut self, qualifier: VisibilityQualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// The value converted to statute miles.
    pub fn in_statute_miles(&self) -> f64 {
        match self.unit {
            VisibilityUnit::StatuteMiles => self.value,
            VisibilityUnit::Metres => self.value / METRES_PER_STATUTE_MILE,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.qualifier {
            Some(VisibilityQualifier::MoreThan) => write!(f, ">{}", self.value),
            Some(VisibilityQualifier::LessThan) => write!(f, "<{}", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

// ============================================================================
// Clouds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CloudCoverage {
    Few,
    Sct,
    Bkn,
    Ovc,
}

impl CloudCoverage {
    pub fn code(self) -> &'static str {
        match self {
            CloudCoverage::Few => "FEW",
            CloudCoverage::Sct => "SCT",
            CloudCoverage::Bkn => "BKN",
            CloudCoverage::Ovc => "OVC",
        }
    }

    /// Broken and overcast layers form a ceiling.
    pub fn forms_ceiling(self) -> bool {
        matches!(self, CloudCoverage::Bkn | CloudCoverage::Ovc)
    }
}

/// Convective cloud type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CloudType {
    Cb,
    Tcu,
}

impl CloudType {
    pub fn code(self) -> &'static str {
        match self {
            CloudType::Cb => "CB",
            CloudType::Tcu => "TCU",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudLayer {
    pub coverage: CloudCoverage,
    /// Base in feet above ground level.
    pub base_ft: u32,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub cloud_type: Option<CloudType>,
}

impl CloudLayer {
    pub fn new(coverage: CloudCoverage, base_ft: u32) -> Self {
        Self {
            coverage,
            base_ft,
            cloud_type: None,
        }
    }

    pub fn with_type(mut self, cloud_type: CloudType) -> Self {
        self.cloud_type = Some(cloud_type);
        self
    }
}

impl fmt::Display for CloudLayer {
    /// Report-style layer, e.g. `BKN080` or `OVC010 CB`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.coverage.code(), self.base_ft / 100)?;
        if let Some(t) = self.cloud_type {
            write!(f, " {}", t.code())?;
        }
        Ok(())
    }
}

/// Cloud layers together with the ceiling derived from them.
///
/// The ceiling is the lowest base among BKN/OVC layers, or `None` when no
/// layer qualifies. Layers can only be set through [`Sky::new`] or
/// [`Sky::set_layers`], both of which recompute it, so the two never drift
/// apart. Deserializing ignores any supplied ceiling.
///
/// ```
/// use briefing_server::domain::{CloudCoverage, CloudLayer, Sky};
///
/// let sky = Sky::new(vec![
///     CloudLayer::new(CloudCoverage::Few, 3500),
///     CloudLayer::new(CloudCoverage::Ovc, 2500),
///     CloudLayer::new(CloudCoverage::Bkn, 1500),
/// ]);
/// assert_eq!(sky.ceiling(), Some(1500));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "SkyRepr")]
pub struct Sky {
    layers: Vec<CloudLayer>,
    ceiling: Option<u32>,
}

#[derive(Deserialize)]
struct SkyRepr {
    #[serde(default)]
    layers: Vec<CloudLayer>,
}

impl From<SkyRepr> for Sky {
    fn from(value: SkyRepr) -> Self {
        Sky::new(value.layers)
    }
}

impl Sky {
    pub fn new(layers: Vec<CloudLayer>) -> Self {
        let ceiling = derive_ceiling(&layers);
        Self { layers, ceiling }
    }

    /// No cloud reported.
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[CloudLayer] {
        &self.layers
    }

    /// Lowest BKN/OVC base in feet, if any.
    pub fn ceiling(&self) -> Option<u32> {
        self.ceiling
    }

    pub fn set_layers(&mut self, layers: Vec<CloudLayer>) {
        self.ceiling = derive_ceiling(&layers);
        self.layers = layers;
    }
}

fn derive_ceiling(layers: &[CloudLayer]) -> Option<u32> {
    layers
        .iter()
        .filter(|l| l.coverage.forms_ceiling())
        .map(|l| l.base_ft)
        .min()
}

// ============================================================================
// Altimeter
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AltimeterUnit {
    #[serde(rename = "inHg")]
    InchesOfMercury,
    #[serde(rename = "hPa")]
    Hectopascals,
}

impl AltimeterUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            AltimeterUnit::InchesOfMercury => "inHg",
            AltimeterUnit::Hectopascals => "hPa",
        }
    }
}

/// Altimeter setting (QNH).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Altimeter {
    pub value: f64,
    pub unit: AltimeterUnit,
}

impl Altimeter {
    pub fn hectopascals(value: f64) -> Self {
        Self {
            value,
            unit: AltimeterUnit::Hectopascals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(c: CloudCoverage, base: u32) -> CloudLayer {
        CloudLayer::new(c, base)
    }

    #[test]
    fn ceiling_is_lowest_broken_or_overcast() {
        let sky = Sky::new(vec![
            layer(CloudCoverage::Few, 3500),
            layer(CloudCoverage::Sct, 4500),
            layer(CloudCoverage::Bkn, 8000),
        ]);
        assert_eq!(sky.ceiling(), Some(8000));
    }

    #[test]
    fn scattered_layers_are_not_a_ceiling() {
        let sky = Sky::new(vec![
            layer(CloudCoverage::Few, 500),
            layer(CloudCoverage::Sct, 800),
        ]);
        assert_eq!(sky.ceiling(), None);
        assert_eq!(Sky::clear().ceiling(), None);
    }

    #[test]
    fn set_layers_recomputes_ceiling() {
        let mut sky = Sky::new(vec![layer(CloudCoverage::Bkn, 1500)]);
        sky.set_layers(vec![layer(CloudCoverage::Ovc, 700), layer(CloudCoverage::Bkn, 900)]);
        assert_eq!(sky.ceiling(), Some(700));

        sky.set_layers(vec![]);
        assert_eq!(sky.ceiling(), None);
    }

    #[test]
    fn deserializing_recomputes_ceiling() {
        let json = r#"{"layers":[{"coverage":"BKN","base_ft":1200}],"ceiling":99999}"#;
        let sky: Sky = serde_json::from_str(json).unwrap();
        assert_eq!(sky.ceiling(), Some(1200));

        let out = serde_json::to_value(&sky).unwrap();
        assert_eq!(out["ceiling"], 1200);
    }

    #[test]
    fn cloud_layer_display() {
        assert_eq!(layer(CloudCoverage::Few, 3500).to_string(), "FEW035");
        assert_eq!(
            layer(CloudCoverage::Ovc, 1000)
                .with_type(CloudType::Cb)
                .to_string(),
            "OVC010 CB"
        );
        assert_eq!(layer(CloudCoverage::Ovc, 100).to_string(), "OVC001");
    }

    #[test]
    fn visibility_display_and_conversion() {
        let vis = Visibility::statute_miles(10.0).with_qualifier(VisibilityQualifier::MoreThan);
        assert_eq!(vis.to_string(), ">10");
        assert_eq!(Visibility::statute_miles(1.25).to_string(), "1.25");

        let metric = Visibility {
            value: 1609.344,
            unit: VisibilityUnit::Metres,
            qualifier: None,
        };
        assert!((metric.in_statute_miles() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wind_direction_wire_format() {
        let wind = Wind::knots(WindDirection::Variable, 3);
        let json = serde_json::to_value(&wind).unwrap();
        assert_eq!(json["direction"], "VRB");
        assert_eq!(json["unit"], "KT");

        let wind: Wind =
            serde_json::from_str(r#"{"direction":250,"speed":12,"gust":22,"unit":"KT"}"#).unwrap();
        assert_eq!(wind.direction, WindDirection::Degrees(250));
        assert_eq!(wind.gust, Some(22));

        assert!(serde_json::from_str::<WindDirection>("\"NNE\"").is_err());
        assert!(serde_json::from_str::<WindDirection>("400").is_err());
    }

    #[test]
    fn wind_display() {
        assert_eq!(
            Wind::knots(WindDirection::Degrees(250), 12)
                .with_gust(22)
                .to_string(),
            "25012G22KT"
        );
        assert_eq!(Wind::knots(WindDirection::Variable, 3).to_string(), "VRB03KT");
    }

    #[test]
    fn significant_gust_requires_exceeding_speed() {
        assert_eq!(
            Wind::knots(WindDirection::Degrees(90), 15)
                .with_gust(15)
                .significant_gust(),
            None
        );
        assert_eq!(
            Wind::knots(WindDirection::Degrees(90), 15)
                .with_gust(25)
                .significant_gust(),
            Some(25)
        );
    }
}
