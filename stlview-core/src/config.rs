//! Viewer configuration: the initial position of every control.
//!
//! ```toml
//! color = "lightpink"
//! opacity = 20
//! ambient = 10
//! diffuse = 20
//! roughness = 10
//! specular = 4
//! ```
//!
//! Continuous parameters are given as level indices (`0..=20`, value
//! `level * 0.05`). Missing keys keep their defaults.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::ColorName;
use crate::control::Selection;
use crate::error::{ConfigError, ParameterError};
use crate::params::{ParameterName, LEVEL_COUNT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub color: String,
    pub opacity: usize,
    pub ambient: usize,
    pub diffuse: usize,
    pub roughness: usize,
    pub specular: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            color: ColorName::LIGHTPINK.to_string(),
            opacity: 20,
            ambient: 10,
            diffuse: 20,
            roughness: 10,
            specular: 4,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Check that the color is in the catalog and every level is in range.
    pub fn validate(&self) -> Result<(), ParameterError> {
        ColorName::parse(&self.color)?;
        for name in ParameterName::ALL.into_iter().filter(|n| n.is_continuous()) {
            let level = self.level(name);
            if level >= LEVEL_COUNT {
                return Err(ParameterError::InvalidLevel {
                    parameter: name,
                    level,
                });
            }
        }
        Ok(())
    }

    fn level(&self, name: ParameterName) -> usize {
        match name {
            ParameterName::Opacity => self.opacity,
            ParameterName::Ambient => self.ambient,
            ParameterName::Diffuse => self.diffuse,
            ParameterName::Roughness => self.roughness,
            ParameterName::Specular => self.specular,
            ParameterName::Color => 0,
        }
    }

    /// Overwrite the initial level of a continuous parameter.
    pub fn set_level(&mut self, name: ParameterName, level: usize) {
        match name {
            ParameterName::Opacity => self.opacity = level,
            ParameterName::Ambient => self.ambient = level,
            ParameterName::Diffuse => self.diffuse = level,
            ParameterName::Roughness => self.roughness = level,
            ParameterName::Specular => self.specular = level,
            ParameterName::Color => {}
        }
    }

    /// The initial selection for a parameter's control.
    pub fn initial(&self, name: ParameterName) -> Selection {
        match name {
            ParameterName::Color => Selection::Label(self.color.clone()),
            _ => Selection::Level(self.level(name)),
        }
    }
}
