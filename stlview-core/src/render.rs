//! Renderer-facing interface: mesh hand-off and parameter updates
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::ColorName;
use crate::mesh::Mesh;
use crate::params::{ParameterName, ParameterSet, ParameterValue};

/// A change to exactly one render parameter.
///
/// Updates know nothing about the mesh. Applying the same update more
/// than once leaves the renderer in the same state as applying it once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderUpdate {
    pub parameter: ParameterName,
    pub value: ParameterValue,
}

impl RenderUpdate {
    pub fn new(parameter: ParameterName, value: impl Into<ParameterValue>) -> Self {
        Self {
            parameter,
            value: value.into(),
        }
    }

    /// Attribute path this update targets, e.g. `lighting.ambient`.
    pub fn path(&self) -> &'static str {
        self.parameter.render_path()
    }
}

impl fmt::Display for RenderUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.path(), self.value)
    }
}

/// Something that draws a mesh with the current render parameters.
pub trait Renderer {
    /// Hand over the decoded mesh. Called once per run, after a
    /// successful decode.
    fn load_mesh(&mut self, mesh: Arc<Mesh>);

    /// Apply one parameter change.
    fn apply_update(&mut self, update: &RenderUpdate);
}

/// Shading-model coefficients, each in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub diffuse: f32,
    pub roughness: f32,
    pub specular: f32,
}

/// Surface appearance as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: ColorName,
    pub opacity: f32,
    pub lighting: Lighting,
}

impl Material {
    /// Apply one update. Updates whose value kind does not match the
    /// parameter are dropped.
    pub fn apply(&mut self, update: &RenderUpdate) {
        let RenderUpdate { parameter, value } = *update;
        match (parameter, value) {
            (ParameterName::Color, ParameterValue::Color(color)) => self.color = color,
            (ParameterName::Opacity, ParameterValue::Level(v)) => self.opacity = v as f32,
            (ParameterName::Ambient, ParameterValue::Level(v)) => self.lighting.ambient = v as f32,
            (ParameterName::Diffuse, ParameterValue::Level(v)) => self.lighting.diffuse = v as f32,
            (ParameterName::Roughness, ParameterValue::Level(v)) => {
                self.lighting.roughness = v as f32
            }
            (ParameterName::Specular, ParameterValue::Level(v)) => {
                self.lighting.specular = v as f32
            }
            _ => warn!(%update, "dropping update with mismatched value"),
        }
    }
}

impl From<&ParameterSet> for Material {
    fn from(params: &ParameterSet) -> Self {
        let level = |name| params.level(name).unwrap_or_default() as f32;
        Self {
            color: params.color(),
            opacity: level(ParameterName::Opacity),
            lighting: Lighting {
                ambient: level(ParameterName::Ambient),
                diffuse: level(ParameterName::Diffuse),
                roughness: level(ParameterName::Roughness),
                specular: level(ParameterName::Specular),
            },
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::from(&ParameterSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material() {
        let material = Material::default();
        assert_eq!(material.color, ColorName::LIGHTPINK);
        assert_eq!(material.opacity, 1.0);
        assert_eq!(material.lighting.ambient, 0.5);
        assert_eq!(material.lighting.diffuse, 1.0);
        assert_eq!(material.lighting.roughness, 0.5);
        assert_eq!(material.lighting.specular, 0.2);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let update = RenderUpdate::new(ParameterName::Roughness, 0.85);

        let mut once = Material::default();
        once.apply(&update);
        let mut twice = once;
        twice.apply(&update);

        assert_eq!(once, twice);
        assert_eq!(once.lighting.roughness, 0.85);
    }

    #[test]
    fn test_apply_touches_one_field() {
        let mut material = Material::default();
        let navy = ColorName::parse("navy").unwrap();
        material.apply(&RenderUpdate::new(ParameterName::Color, navy));

        let expected = Material {
            color: navy,
            ..Material::default()
        };
        assert_eq!(material, expected);
    }

    #[test]
    fn test_mismatched_update_is_dropped() {
        let mut material = Material::default();
        material.apply(&RenderUpdate::new(ParameterName::Opacity, ColorName::LIGHTPINK));
        assert_eq!(material, Material::default());
    }

    #[test]
    fn test_update_display() {
        let update = RenderUpdate::new(ParameterName::Ambient, 0.25);
        assert_eq!(update.to_string(), "lighting.ambient=0.25");
    }
}
