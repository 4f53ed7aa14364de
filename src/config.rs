//! Radar configuration
//!
//! `RadarOptions` is the loose, camelCase JSON shape a page hands over;
//! `RadarConfig` is the validated form the radar runs on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::SECTION_COUNT;
use crate::error::{RadarError, Result};
use crate::layout::{LayerShares, SectionId};

/// Default section palette, quadrant order
pub const DEFAULT_FILL_COLORS: [&str; SECTION_COUNT] = ["#FFFFB2", "#FFCCCC", "#CCEBD6", "#CCCCFF"];

/// Raw, unvalidated options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarOptions {
    /// Pixel size of the square canvas (required)
    pub control_size: Option<f64>,
    /// One fill color per section; kept loose so non-arrays are a config error
    pub fill_colors: Option<Value>,
    pub outline_color: Option<String>,
    pub highlight_color: Option<String>,
    pub point_color: Option<String>,
    pub point_highlight_color: Option<String>,
    pub point_active_color: Option<String>,
    /// Pointer debounce window (milliseconds)
    pub debounce_ms: Option<f64>,
    pub layer_shares: Option<LayerShares>,
}

impl RadarOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Options with only the required size set
    pub fn with_size(control_size: f64) -> Self {
        Self {
            control_size: Some(control_size),
            ..Self::default()
        }
    }
}

/// Validated radar configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarConfig {
    pub control_size: f64,
    pub fill_colors: [String; SECTION_COUNT],
    pub outline_color: String,
    pub highlight_color: String,
    pub point_color: String,
    pub point_highlight_color: String,
    pub point_active_color: String,
    pub debounce_ms: f64,
    pub layer_shares: LayerShares,
}

impl RadarConfig {
    /// Configuration with every optional value at its default
    pub fn new(control_size: f64) -> Result<Self> {
        Self::try_from(RadarOptions::with_size(control_size))
    }

    /// Parse and validate a JSON options object
    pub fn from_json(json: &str) -> Result<Self> {
        Self::try_from(RadarOptions::from_json(json)?)
    }

    /// Fill color of a section
    pub fn fill_color(&self, section: SectionId) -> &str {
        &self.fill_colors[section.index()]
    }

    /// Overview radius of a section
    pub fn section_radius(&self) -> f64 {
        self.control_size / 2.0
    }
}

impl TryFrom<RadarOptions> for RadarConfig {
    type Error = RadarError;

    fn try_from(options: RadarOptions) -> Result<Self> {
        let control_size = options.control_size.ok_or(RadarError::MissingControlSize)?;
        if !control_size.is_finite() || control_size <= 0.0 {
            return Err(RadarError::InvalidControlSize(control_size));
        }

        let fill_colors = match options.fill_colors {
            None | Some(Value::Null) => DEFAULT_FILL_COLORS.map(String::from),
            Some(value) => parse_fill_colors(&value)?,
        };

        let debounce_ms = options.debounce_ms.unwrap_or(0.0);
        if !debounce_ms.is_finite() || debounce_ms < 0.0 {
            log::warn!("Ignoring invalid debounceMs {debounce_ms}");
        }

        Ok(Self {
            control_size,
            fill_colors,
            outline_color: options.outline_color.unwrap_or_else(|| "black".into()),
            highlight_color: options.highlight_color.unwrap_or_else(|| "red".into()),
            point_color: options.point_color.unwrap_or_else(|| "black".into()),
            point_highlight_color: options.point_highlight_color.unwrap_or_else(|| "red".into()),
            point_active_color: options.point_active_color.unwrap_or_else(|| "blue".into()),
            debounce_ms: if debounce_ms.is_finite() { debounce_ms.max(0.0) } else { 0.0 },
            layer_shares: options.layer_shares.unwrap_or_default(),
        })
    }
}

/// First four colors of a JSON array; extra colors are ignored
fn parse_fill_colors(value: &Value) -> Result<[String; SECTION_COUNT]> {
    let Value::Array(items) = value else {
        return Err(RadarError::InvalidFillColors(format!("not an array: {value}")));
    };
    if items.len() < SECTION_COUNT {
        return Err(RadarError::InvalidFillColors(format!(
            "{} colors given",
            items.len()
        )));
    }

    let mut colors: [String; SECTION_COUNT] = Default::default();
    for (slot, item) in colors.iter_mut().zip(items) {
        *slot = item
            .as_str()
            .ok_or_else(|| RadarError::InvalidFillColors(format!("not a color: {item}")))?
            .to_string();
    }
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RadarConfig::new(600.0).unwrap();
        assert_eq!(config.fill_colors, DEFAULT_FILL_COLORS.map(String::from));
        assert_eq!(config.outline_color, "black");
        assert_eq!(config.highlight_color, "red");
        assert_eq!(config.point_color, "black");
        assert_eq!(config.point_highlight_color, "red");
        assert_eq!(config.point_active_color, "blue");
        assert_eq!(config.debounce_ms, 0.0);
        assert_eq!(config.layer_shares, LayerShares::SourceCompatible);
        assert_eq!(config.section_radius(), 300.0);
    }

    #[test]
    fn test_missing_control_size() {
        assert!(matches!(
            RadarConfig::from_json("{}"),
            Err(RadarError::MissingControlSize)
        ));
        assert!(matches!(
            RadarConfig::new(-5.0),
            Err(RadarError::InvalidControlSize(_))
        ));
    }

    #[test]
    fn test_fill_colors_validation() {
        let short = r##"{ "controlSize": 400, "fillColors": ["#fff", "#eee"] }"##;
        assert!(matches!(
            RadarConfig::from_json(short),
            Err(RadarError::InvalidFillColors(_))
        ));

        let not_array = r##"{ "controlSize": 400, "fillColors": "#fff" }"##;
        assert!(matches!(
            RadarConfig::from_json(not_array),
            Err(RadarError::InvalidFillColors(_))
        ));

        let ok = r##"{ "controlSize": 400, "fillColors": ["#a", "#b", "#c", "#d", "#e"] }"##;
        let config = RadarConfig::from_json(ok).unwrap();
        assert_eq!(config.fill_color(SectionId::new(4).unwrap()), "#d");
    }

    #[test]
    fn test_camel_case_options() {
        let json = r#"{
            "controlSize": 500,
            "outlineColor": "gray",
            "pointActiveColor": "green",
            "debounceMs": 16,
            "layerShares": "exact"
        }"#;
        let config = RadarConfig::from_json(json).unwrap();
        assert_eq!(config.control_size, 500.0);
        assert_eq!(config.outline_color, "gray");
        assert_eq!(config.point_active_color, "green");
        assert_eq!(config.point_highlight_color, "red");
        assert_eq!(config.debounce_ms, 16.0);
        assert_eq!(config.layer_shares, LayerShares::Exact);
    }
}
