//! Mesh data model produced by the STL decoder
use nalgebra::{Point3, Vector3};

/// A mesh vertex. Vertices carry position only; they are never shared
/// between triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }
}

/// A triangle face, stored as indices into the mesh's vertex sequence.
///
/// Winding order is the order the vertices appeared in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub indices: [u32; 3],
}

impl Triangle {
    /// The triangle owning vertex slots `3i, 3i+1, 3i+2`, or `None` when
    /// those slots do not fit in a `u32`.
    pub(crate) fn nth(i: u32) -> Option<Self> {
        let base = i.checked_mul(3)?;
        let last = base.checked_add(2)?;
        Some(Self {
            indices: [base, base + 1, last],
        })
    }
}

/// Axis-aligned bounding box of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Radius of the sphere centred on [`Bounds::center`] that encloses the box.
    pub fn radius(&self) -> f32 {
        (self.max - self.min).norm() / 2.0
    }
}

/// An immutable triangle mesh.
///
/// Meshes are built once by [`crate::stl`] and expose no mutation API.
/// `vertex_count() == 3 * triangle_count()` always holds.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub(crate) fn with_capacity(triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 3),
            triangles: Vec::with_capacity(triangles),
        }
    }

    /// Append one face with three fresh vertex slots.
    ///
    /// Returns `None`, leaving the mesh unchanged, once the new slots would
    /// exceed the `u32` index range (more than 1,431,655,765 triangles).
    pub(crate) fn push_triangle(&mut self, corners: [Vertex; 3]) -> Option<()> {
        let index = u32::try_from(self.triangles.len()).ok()?;
        let triangle = Triangle::nth(index)?;
        self.vertices.extend_from_slice(&corners);
        self.triangles.push(triangle);
        Some(())
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        debug_assert_eq!(self.vertices.len(), self.triangles.len() * 3);
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The three corner vertices of a triangle in winding order.
    pub fn corners(&self, triangle: &Triangle) -> [Vertex; 3] {
        triangle.indices.map(|i| self.vertices[i as usize])
    }

    /// Geometric face normal derived from the winding order.
    ///
    /// Returns `None` for degenerate (zero-area) triangles.
    pub fn face_normal(&self, triangle: &Triangle) -> Option<Vector3<f32>> {
        let [v0, v1, v2] = self.corners(triangle);
        let edge1 = v1.position - v0.position;
        let edge2 = v2.position - v0.position;
        edge1.cross(&edge2).try_normalize(f32::EPSILON)
    }

    /// Bounding box over every vertex, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.vertices.first()?.position;
        let bounds = self.vertices.iter().fold(
            Bounds {
                min: first,
                max: first,
            },
            |acc, v| Bounds {
                min: acc.min.inf(&v.position),
                max: acc.max.sup(&v.position),
            },
        );
        Some(bounds)
    }
}
