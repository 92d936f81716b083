//! Model orientation and framing of a loaded mesh
use nalgebra::{Matrix4, Vector3};

use crate::mesh::Bounds;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Rotation matrix applying Z, then Y, then X
    pub fn matrix(&self) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(self.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, self.z));
        rz * ry * rx
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Matrix that moves the mesh's bounding-box centre to the origin and
/// scales it to fit a unit sphere.
///
/// STL files use arbitrary units, so renderers work on the normalised mesh.
pub fn normalize(bounds: &Bounds) -> Matrix4<f32> {
    let radius = bounds.radius();
    let scale = if radius > f32::EPSILON { 1.0 / radius } else { 1.0 };
    Matrix4::new_scaling(scale) * Matrix4::new_translation(&-bounds.center().coords)
}

/// Full model matrix: normalise, then rotate about the origin.
pub fn model_matrix(rotation: &RotationState, bounds: Option<&Bounds>) -> Matrix4<f32> {
    let framing = bounds.map(normalize).unwrap_or_else(Matrix4::identity);
    rotation.matrix() * framing
}
