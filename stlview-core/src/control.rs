//! Discrete controls that turn UI selections into render updates.
//!
//! Each [`ControlBinding`] owns the selectable domain of one parameter and
//! its current position in it. Bindings are independent of each other; the
//! [`ControlPanel`] only groups them with the [`ParameterSet`] they drive.
use tracing::debug;

use crate::color::{catalog, ColorName};
use crate::config::ViewerConfig;
use crate::error::ParameterError;
use crate::params::{
    level_label, level_value, nearest_level, ParameterName, ParameterSet, ParameterValue,
    LEVEL_COUNT,
};
use crate::render::RenderUpdate;

/// A UI selection: a step index or a step label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Level(usize),
    Label(String),
}

impl From<usize> for Selection {
    fn from(level: usize) -> Self {
        Selection::Level(level)
    }
}

impl From<&str> for Selection {
    fn from(label: &str) -> Self {
        Selection::Label(label.to_string())
    }
}

impl From<String> for Selection {
    fn from(label: String) -> Self {
        Selection::Label(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Still at the position chosen at initialization.
    AtDefault,
    /// Moved by at least one successful selection.
    Selected,
}

/// The control for a single parameter.
#[derive(Debug, Clone)]
pub struct ControlBinding {
    parameter: ParameterName,
    default_index: usize,
    active: usize,
    value: ParameterValue,
    state: BindingState,
}

impl ControlBinding {
    /// Create a binding positioned at `initial`.
    pub fn new(
        parameter: ParameterName,
        initial: impl Into<Selection>,
    ) -> Result<Self, ParameterError> {
        let (index, value) = resolve(parameter, &initial.into())?;
        Ok(Self {
            parameter,
            default_index: index,
            active: index,
            value,
            state: BindingState::AtDefault,
        })
    }

    pub fn parameter(&self) -> ParameterName {
        self.parameter
    }

    /// Number of selectable steps.
    pub fn len(&self) -> usize {
        if self.parameter.is_continuous() {
            LEVEL_COUNT
        } else {
            catalog().len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn default_index(&self) -> usize {
        self.default_index
    }

    pub fn state(&self) -> BindingState {
        self.state
    }

    /// Label of step `index`: `"0.05"` for levels, the name for colors.
    pub fn label(&self, index: usize) -> Option<String> {
        if self.parameter.is_continuous() {
            level_label(index)
        } else {
            ColorName::from_index(index).map(|color| color.as_str().to_string())
        }
    }

    /// All step labels in order.
    pub fn labels(&self) -> Vec<String> {
        (0..self.len()).filter_map(|i| self.label(i)).collect()
    }

    pub fn current_label(&self) -> String {
        self.label(self.active).unwrap_or_default()
    }

    /// Value of the active step.
    pub fn value(&self) -> ParameterValue {
        self.value
    }

    /// Move to `selection`, record the new value in `params` and describe
    /// the change.
    ///
    /// # Errors
    ///
    /// [`ParameterError::InvalidLevel`], [`ParameterError::InvalidLabel`] or
    /// [`ParameterError::UnknownColor`] when the selection is not in the
    /// domain. Neither the binding nor `params` change on error.
    pub fn select(
        &mut self,
        params: &mut ParameterSet,
        selection: impl Into<Selection>,
    ) -> Result<RenderUpdate, ParameterError> {
        let (index, value) = resolve(self.parameter, &selection.into())?;
        params.set(self.parameter, value)?;
        self.active = index;
        self.value = value;
        self.state = BindingState::Selected;

        let update = RenderUpdate::new(self.parameter, value);
        debug!(%update, index, "control selected");
        Ok(update)
    }

    /// The selection `delta` steps away from the active one. Levels stop at
    /// either end; colors wrap around.
    pub fn step(&self, delta: isize) -> Selection {
        let len = self.len() as isize;
        let target = self.active as isize + delta;
        let index = if self.parameter.is_continuous() {
            target.clamp(0, len - 1)
        } else {
            target.rem_euclid(len)
        };
        Selection::Level(index as usize)
    }

    /// The selection that returns this control to its initial position.
    pub fn reset(&self) -> Selection {
        Selection::Level(self.default_index)
    }
}

fn value_at(parameter: ParameterName, index: usize) -> Option<ParameterValue> {
    if parameter.is_continuous() {
        level_value(index).map(ParameterValue::Level)
    } else {
        ColorName::from_index(index).map(ParameterValue::Color)
    }
}

fn resolve(
    parameter: ParameterName,
    selection: &Selection,
) -> Result<(usize, ParameterValue), ParameterError> {
    match selection {
        Selection::Level(level) => value_at(parameter, *level)
            .map(|value| (*level, value))
            .ok_or(ParameterError::InvalidLevel {
                parameter,
                level: *level,
            }),
        Selection::Label(label) if parameter.is_continuous() => (0..LEVEL_COUNT)
            .find(|&i| level_label(i).as_deref() == Some(label.as_str()))
            .and_then(|i| Some((i, value_at(parameter, i)?)))
            .ok_or_else(|| ParameterError::InvalidLabel {
                parameter,
                label: label.clone(),
            }),
        Selection::Label(label) => {
            let color = ColorName::parse(label)?;
            Ok((color.index(), ParameterValue::Color(color)))
        }
    }
}

/// One binding per parameter, plus the parameter values they drive.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    // In `ParameterName::ALL` order
    bindings: Vec<ControlBinding>,
    params: ParameterSet,
}

impl ControlPanel {
    /// Build the panel at the positions named by `config`.
    pub fn from_config(config: &ViewerConfig) -> Result<Self, ParameterError> {
        let mut params = ParameterSet::default();
        let bindings = ParameterName::ALL
            .into_iter()
            .map(|name| {
                let binding = ControlBinding::new(name, config.initial(name))?;
                params.set(name, binding.value())?;
                Ok(binding)
            })
            .collect::<Result<Vec<_>, ParameterError>>()?;
        Ok(Self { bindings, params })
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    pub fn binding(&self, name: ParameterName) -> &ControlBinding {
        &self.bindings[name as usize]
    }

    pub fn bindings(&self) -> impl Iterator<Item = &ControlBinding> {
        self.bindings.iter()
    }

    /// Apply a selection to the named parameter's control.
    pub fn select(
        &mut self,
        name: ParameterName,
        selection: impl Into<Selection>,
    ) -> Result<RenderUpdate, ParameterError> {
        self.bindings[name as usize].select(&mut self.params, selection)
    }

    /// Like [`ControlPanel::select`], with the parameter given by name.
    pub fn select_by_name(
        &mut self,
        name: &str,
        selection: impl Into<Selection>,
    ) -> Result<RenderUpdate, ParameterError> {
        self.select(name.parse()?, selection)
    }

    /// Move the named control `delta` steps.
    pub fn step(&mut self, name: ParameterName, delta: isize) -> Result<RenderUpdate, ParameterError> {
        let selection = self.binding(name).step(delta);
        self.select(name, selection)
    }

    /// Return the named control to its initial position.
    pub fn reset(&mut self, name: ParameterName) -> Result<RenderUpdate, ParameterError> {
        let selection = self.binding(name).reset();
        self.select(name, selection)
    }

    /// One update per parameter describing the full current state, for
    /// bringing a freshly loaded renderer in line with the panel.
    pub fn initial_updates(&self) -> Vec<RenderUpdate> {
        self.params
            .iter()
            .map(|(name, value)| RenderUpdate::new(name, value))
            .collect()
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        let params = ParameterSet::default();
        let bindings = ParameterName::ALL
            .into_iter()
            .map(|parameter| {
                let value = params.get(parameter);
                let default_index = match value {
                    ParameterValue::Color(color) => color.index(),
                    ParameterValue::Level(level) => nearest_level(level).unwrap_or(0),
                };
                ControlBinding {
                    parameter,
                    default_index,
                    active: default_index,
                    value,
                    state: BindingState::AtDefault,
                }
            })
            .collect();
        Self { bindings, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Material, Renderer};
    use crate::Mesh;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingRenderer {
        material: Material,
        updates: Vec<RenderUpdate>,
    }

    impl Renderer for RecordingRenderer {
        fn load_mesh(&mut self, _mesh: Arc<Mesh>) {}

        fn apply_update(&mut self, update: &RenderUpdate) {
            self.material.apply(update);
            self.updates.push(*update);
        }
    }

    #[test]
    fn test_select_top_level_is_exactly_one() {
        let mut panel = ControlPanel::default();
        let update = panel.select(ParameterName::Opacity, 20).unwrap();
        assert_eq!(update, RenderUpdate::new(ParameterName::Opacity, 1.0));
        assert_eq!(update.value.as_f64(), Some(1.0));
    }

    #[test]
    fn test_every_level_is_canonical() {
        let mut panel = ControlPanel::default();
        for level in 0..LEVEL_COUNT {
            let update = panel.select(ParameterName::Specular, level).unwrap();
            let value = update.value.as_f64().unwrap();
            assert_eq!(value, level as f64 / 20.0);
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_select_color_by_label() {
        let mut panel = ControlPanel::default();
        panel.select(ParameterName::Color, "navy").unwrap();

        let update = panel.select(ParameterName::Color, "lightpink").unwrap();
        assert_eq!(update.parameter, ParameterName::Color);
        assert_eq!(update.value.as_color().unwrap().as_str(), "lightpink");
        assert_eq!(panel.parameters().color().as_str(), "lightpink");
    }

    #[test]
    fn test_unknown_color_leaves_state_unchanged() {
        let mut panel = ControlPanel::default();
        let before = panel.parameters().clone();

        let err = panel.select(ParameterName::Color, "not-a-color").unwrap_err();
        assert_eq!(err, ParameterError::UnknownColor("not-a-color".into()));
        assert_eq!(panel.parameters(), &before);

        let binding = panel.binding(ParameterName::Color);
        assert_eq!(binding.state(), BindingState::AtDefault);
        assert_eq!(binding.current_label(), "lightpink");
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut panel = ControlPanel::default();
        let err = panel.select(ParameterName::Ambient, 21).unwrap_err();
        assert_eq!(
            err,
            ParameterError::InvalidLevel {
                parameter: ParameterName::Ambient,
                level: 21
            }
        );
        assert_eq!(panel.binding(ParameterName::Ambient).active(), 10);
    }

    #[test]
    fn test_select_level_by_label() {
        let mut panel = ControlPanel::default();
        let update = panel.select(ParameterName::Diffuse, "0.35").unwrap();
        assert_eq!(update.value, ParameterValue::Level(0.35));
        assert_eq!(panel.binding(ParameterName::Diffuse).active(), 7);

        assert!(matches!(
            panel.select(ParameterName::Diffuse, "0.33"),
            Err(ParameterError::InvalidLabel { .. })
        ));
    }

    #[test]
    fn test_state_moves_to_selected() {
        let mut panel = ControlPanel::default();
        assert!(panel
            .bindings()
            .all(|b| b.state() == BindingState::AtDefault));

        panel.select(ParameterName::Roughness, 10).unwrap();
        assert_eq!(
            panel.binding(ParameterName::Roughness).state(),
            BindingState::Selected
        );
        assert_eq!(
            panel.binding(ParameterName::Opacity).state(),
            BindingState::AtDefault
        );
    }

    #[test]
    fn test_default_positions() {
        let panel = ControlPanel::default();
        let actives: Vec<usize> = panel.bindings().map(|b| b.active()).collect();
        assert_eq!(actives, vec![ColorName::LIGHTPINK.index(), 20, 10, 20, 10, 4]);
    }

    #[test]
    fn test_step_clamps_levels_and_wraps_colors() {
        let mut panel = ControlPanel::default();

        let update = panel.step(ParameterName::Opacity, 1).unwrap();
        assert_eq!(update.value, ParameterValue::Level(1.0));
        let update = panel.step(ParameterName::Opacity, -3).unwrap();
        assert_eq!(update.value, ParameterValue::Level(0.85));

        panel.select(ParameterName::Color, "yellowgreen").unwrap();
        let update = panel.step(ParameterName::Color, 1).unwrap();
        assert_eq!(update.value.as_color().unwrap().as_str(), "aliceblue");
        let update = panel.step(ParameterName::Color, -1).unwrap();
        assert_eq!(update.value.as_color().unwrap().as_str(), "yellowgreen");
    }

    #[test]
    fn test_reset_returns_to_default() {
        let mut panel = ControlPanel::default();
        panel.select(ParameterName::Specular, 17).unwrap();
        let update = panel.reset(ParameterName::Specular).unwrap();
        assert_eq!(update.value, ParameterValue::Level(0.2));
    }

    #[test]
    fn test_select_by_name() {
        let mut panel = ControlPanel::default();
        let update = panel.select_by_name("ambient", 0).unwrap();
        assert_eq!(update, RenderUpdate::new(ParameterName::Ambient, 0.0));
        assert!(matches!(
            panel.select_by_name("shadow", 0),
            Err(ParameterError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_labels() {
        let panel = ControlPanel::default();
        let labels = panel.binding(ParameterName::Opacity).labels();
        assert_eq!(labels.len(), 21);
        assert_eq!(labels.first().map(String::as_str), Some("0.00"));
        assert_eq!(labels.last().map(String::as_str), Some("1.00"));
        assert_eq!(panel.binding(ParameterName::Color).labels().len(), 147);
    }

    #[test]
    fn test_updates_drive_renderer() {
        let mut panel = ControlPanel::default();
        let mut renderer = RecordingRenderer::default();
        for update in panel.initial_updates() {
            renderer.apply_update(&update);
        }
        assert_eq!(renderer.updates.len(), 6);
        assert_eq!(renderer.material, Material::default());

        let update = panel.select(ParameterName::Ambient, 3).unwrap();
        renderer.apply_update(&update);
        let once = renderer.material;
        renderer.apply_update(&update);
        assert_eq!(renderer.material, once);
        assert_eq!(renderer.material, Material::from(panel.parameters()));
    }

    #[test]
    fn test_from_config_matches_default() {
        let panel = ControlPanel::from_config(&ViewerConfig::default()).unwrap();
        let default = ControlPanel::default();
        assert_eq!(panel.parameters(), default.parameters());
        for (a, b) in panel.bindings().zip(default.bindings()) {
            assert_eq!(a.active(), b.active());
            assert_eq!(a.default_index(), b.default_index());
        }
    }
}
