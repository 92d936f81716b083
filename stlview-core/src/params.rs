//! Render parameters and their discretization.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::ColorName;
use crate::error::ParameterError;

/// Number of selectable levels for a continuous parameter.
pub const LEVEL_COUNT: usize = 21;

/// Distance between two adjacent levels.
pub const LEVEL_STEP: f64 = 0.05;

/// Canonical level values. Controls always take their values from this
/// table so that level 20 is exactly `1.0`.
pub const LEVELS: [f64; LEVEL_COUNT] = [
    0.00, 0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40, 0.45, 0.50, 0.55, 0.60, 0.65, 0.70,
    0.75, 0.80, 0.85, 0.90, 0.95, 1.00,
];

/// Value of a level index, or `None` past the last level.
pub fn level_value(level: usize) -> Option<f64> {
    LEVELS.get(level).copied()
}

/// Display label of a level, e.g. `"0.05"`.
pub fn level_label(level: usize) -> Option<String> {
    level_value(level).map(|v| format!("{v:.2}"))
}

/// The level closest to `value`, or `None` if `value` is outside `[0.0, 1.0]`.
pub fn nearest_level(value: f64) -> Option<usize> {
    if !(0.0..=1.0).contains(&value) {
        return None;
    }
    Some((value / LEVEL_STEP).round() as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterName {
    Color,
    Opacity,
    Ambient,
    Diffuse,
    Roughness,
    Specular,
}

impl ParameterName {
    pub const ALL: [ParameterName; 6] = [
        ParameterName::Color,
        ParameterName::Opacity,
        ParameterName::Ambient,
        ParameterName::Diffuse,
        ParameterName::Roughness,
        ParameterName::Specular,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParameterName::Color => "color",
            ParameterName::Opacity => "opacity",
            ParameterName::Ambient => "ambient",
            ParameterName::Diffuse => "diffuse",
            ParameterName::Roughness => "roughness",
            ParameterName::Specular => "specular",
        }
    }

    /// Attribute path of the parameter on the rendered trace.
    pub fn render_path(self) -> &'static str {
        match self {
            ParameterName::Color => "color",
            ParameterName::Opacity => "opacity",
            ParameterName::Ambient => "lighting.ambient",
            ParameterName::Diffuse => "lighting.diffuse",
            ParameterName::Roughness => "lighting.roughness",
            ParameterName::Specular => "lighting.specular",
        }
    }

    /// Human-readable control title, e.g. `"Opacity"`.
    pub fn title(self) -> &'static str {
        match self {
            ParameterName::Color => "Color",
            ParameterName::Opacity => "Opacity",
            ParameterName::Ambient => "Ambient",
            ParameterName::Diffuse => "Diffuse",
            ParameterName::Roughness => "Roughness",
            ParameterName::Specular => "Specular",
        }
    }

    pub fn is_continuous(self) -> bool {
        self != ParameterName::Color
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterName {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ParameterError::UnknownParameter(s.to_string()))
    }
}

/// Current value of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Color(ColorName),
    Level(f64),
}

impl ParameterValue {
    pub fn as_color(&self) -> Option<ColorName> {
        match *self {
            ParameterValue::Color(color) => Some(color),
            ParameterValue::Level(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ParameterValue::Level(value) => Some(value),
            ParameterValue::Color(_) => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Color(color) => write!(f, "{color}"),
            ParameterValue::Level(value) => write!(f, "{value:.2}"),
        }
    }
}

impl From<ColorName> for ParameterValue {
    fn from(color: ColorName) -> Self {
        ParameterValue::Color(color)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Level(value)
    }
}

/// The current value of every render parameter.
///
/// `set` only records values; it never notifies a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    color: ColorName,
    // Indexed by `continuous_slot`
    levels: [f64; 5],
}

fn continuous_slot(name: ParameterName) -> Option<usize> {
    match name {
        ParameterName::Color => None,
        ParameterName::Opacity => Some(0),
        ParameterName::Ambient => Some(1),
        ParameterName::Diffuse => Some(2),
        ParameterName::Roughness => Some(3),
        ParameterName::Specular => Some(4),
    }
}

impl ParameterSet {
    pub fn get(&self, name: ParameterName) -> ParameterValue {
        match continuous_slot(name) {
            Some(slot) => ParameterValue::Level(self.levels[slot]),
            None => ParameterValue::Color(self.color),
        }
    }

    pub fn color(&self) -> ColorName {
        self.color
    }

    /// Value of a continuous parameter; `None` for `color`.
    pub fn level(&self, name: ParameterName) -> Option<f64> {
        continuous_slot(name).map(|slot| self.levels[slot])
    }

    /// Replace a parameter's value.
    ///
    /// # Errors
    ///
    /// [`ParameterError::OutOfRange`] for a continuous value outside
    /// `[0.0, 1.0]`, or [`ParameterError::KindMismatch`] when the value
    /// kind does not fit the parameter. The set is unchanged on error.
    pub fn set(
        &mut self,
        name: ParameterName,
        value: impl Into<ParameterValue>,
    ) -> Result<(), ParameterError> {
        match (continuous_slot(name), value.into()) {
            (None, ParameterValue::Color(color)) => self.color = color,
            (Some(slot), ParameterValue::Level(value)) => {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ParameterError::OutOfRange {
                        parameter: name,
                        value,
                    });
                }
                self.levels[slot] = value;
            }
            _ => return Err(ParameterError::KindMismatch { parameter: name }),
        }
        Ok(())
    }

    /// Set `color` from a catalog label.
    ///
    /// # Errors
    ///
    /// [`ParameterError::UnknownColor`] if `label` is not in the catalog.
    pub fn set_color(&mut self, label: &str) -> Result<(), ParameterError> {
        self.color = ColorName::parse(label)?;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParameterName, ParameterValue)> + '_ {
        ParameterName::ALL
            .into_iter()
            .map(move |name| (name, self.get(name)))
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            color: ColorName::LIGHTPINK,
            levels: [1.0, 0.5, 1.0, 0.5, 0.2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_table_is_exact() {
        for (i, &value) in LEVELS.iter().enumerate() {
            assert_eq!(value, i as f64 / 20.0);
        }
        assert_eq!(level_value(20), Some(1.0));
        assert_eq!(level_value(1), Some(0.05));
        assert_eq!(level_value(21), None);
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(level_label(0).as_deref(), Some("0.00"));
        assert_eq!(level_label(1).as_deref(), Some("0.05"));
        assert_eq!(level_label(20).as_deref(), Some("1.00"));
    }

    #[test]
    fn test_nearest_level() {
        assert_eq!(nearest_level(0.0), Some(0));
        assert_eq!(nearest_level(0.2), Some(4));
        assert_eq!(nearest_level(0.51), Some(10));
        assert_eq!(nearest_level(1.0), Some(20));
        assert_eq!(nearest_level(1.01), None);
        assert_eq!(nearest_level(f64::NAN), None);
    }

    #[test]
    fn test_parameter_names_round_trip() {
        for name in ParameterName::ALL {
            assert_eq!(name.as_str().parse::<ParameterName>().unwrap(), name);
        }
        assert_eq!(
            "shadow".parse::<ParameterName>(),
            Err(ParameterError::UnknownParameter("shadow".into()))
        );
        assert_eq!(ParameterName::Specular.render_path(), "lighting.specular");
    }

    #[test]
    fn test_defaults() {
        let params = ParameterSet::default();
        assert_eq!(params.color().as_str(), "lightpink");
        assert_eq!(params.level(ParameterName::Opacity), Some(1.0));
        assert_eq!(params.level(ParameterName::Ambient), Some(0.5));
        assert_eq!(params.level(ParameterName::Diffuse), Some(1.0));
        assert_eq!(params.level(ParameterName::Roughness), Some(0.5));
        assert_eq!(params.level(ParameterName::Specular), Some(0.2));
        assert_eq!(params.level(ParameterName::Color), None);
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut params = ParameterSet::default();
        let before = params.clone();

        for bad in [-0.01, 1.0001, f64::NAN, f64::INFINITY] {
            let err = params.set(ParameterName::Opacity, bad).unwrap_err();
            assert!(matches!(err, ParameterError::OutOfRange { .. }));
        }
        assert_eq!(params, before);

        params.set(ParameterName::Opacity, 0.3).unwrap();
        assert_eq!(params.get(ParameterName::Opacity), ParameterValue::Level(0.3));
    }

    #[test]
    fn test_set_color() {
        let mut params = ParameterSet::default();
        params.set_color("navy").unwrap();
        assert_eq!(params.color().as_str(), "navy");

        let err = params.set_color("not-a-color").unwrap_err();
        assert_eq!(err, ParameterError::UnknownColor("not-a-color".into()));
        assert_eq!(params.color().as_str(), "navy");
    }

    #[test]
    fn test_set_kind_mismatch() {
        let mut params = ParameterSet::default();
        let navy = ColorName::parse("navy").unwrap();
        assert!(matches!(
            params.set(ParameterName::Opacity, navy),
            Err(ParameterError::KindMismatch { .. })
        ));
        assert!(matches!(
            params.set(ParameterName::Color, 0.5),
            Err(ParameterError::KindMismatch { .. })
        ));
    }
}
