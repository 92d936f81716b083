//! ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;
use stlview_core::{Camera, Lighting, Material, Mesh, ScreenPoint, Triangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f32 = 2.0;

/// Shininess exponent range mapped from roughness 1.0 (dull) to 0.0 (glossy)
const MIN_SHININESS: f32 = 2.0;
const MAX_SHININESS: f32 = 64.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    rgb: [u8; 3],
}

const EMPTY: Cell = Cell {
    character: ' ',
    rgb: [0, 0, 0],
};

/// Result of shading one face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shade {
    pub rgb: [u8; 3],
    /// Perceived brightness after opacity, in `[0, 1]`
    pub intensity: f32,
}

impl Shade {
    pub fn character(&self) -> char {
        let last = LUMINOSITY_RAMP.len() - 1;
        let index = (self.intensity * last as f32).round() as usize;
        LUMINOSITY_RAMP[index.min(last)]
    }
}

/// Phong-style shading of a face with unit `normal`, lit from unit
/// direction `light` and seen from unit direction `view`.
///
/// The surface color is blended over a black background by opacity.
pub fn shade(material: &Material, normal: &Vector3<f32>, light: &Vector3<f32>, view: &Vector3<f32>) -> Shade {
    let Lighting {
        ambient,
        diffuse,
        roughness,
        specular,
    } = material.lighting;

    let n_dot_l = normal.dot(light).max(0.0);
    let reflected = normal * (2.0 * normal.dot(light)) - light;
    let shininess = MIN_SHININESS + (1.0 - roughness) * (MAX_SHININESS - MIN_SHININESS);
    let highlight = if n_dot_l > 0.0 {
        reflected.dot(view).max(0.0).powf(shininess)
    } else {
        0.0
    };

    let body = (ambient + diffuse * n_dot_l).min(1.0);
    let gloss = specular * highlight;
    let opacity = material.opacity.clamp(0.0, 1.0);

    let base = material.color.rgb();
    let rgb = base.map(|c| {
        let lit = (c as f32 / 255.0) * body + gloss;
        (lit.min(1.0) * opacity * 255.0).round() as u8
    });

    Shade {
        rgb,
        intensity: ((body + gloss).min(1.0) * opacity).clamp(0.0, 1.0),
    }
}

/// ASCII renderer that converts a mesh to colored terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![EMPTY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(EMPTY);
    }

    /// Character at a cell, for inspection.
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.cells.get(y * self.width + x).map(|c| c.character)
    }

    /// Number of cells covered by the mesh in the last frame.
    pub fn covered(&self) -> usize {
        self.depth_buffer.iter().filter(|d| d.is_finite()).count()
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        material: &Material,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        let view_projection = camera.view_projection();
        let view = camera.view_direction();
        // Headlight, raised and offset so front faces are not flat-lit
        let light = (view + Vector3::new(0.3, 0.5, 0.0)).normalize();

        for triangle in mesh.triangles() {
            self.render_triangle(mesh, triangle, material, model_matrix, &view_projection, &light, &view);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_triangle(
        &mut self,
        mesh: &Mesh,
        triangle: &Triangle,
        material: &Material,
        model_matrix: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
        light: &Vector3<f32>,
        view: &Vector3<f32>,
    ) {
        let world: [Point3<f32>; 3] = mesh
            .corners(triangle)
            .map(|v| model_matrix.transform_point(&v.position));

        let Some(mut normal) = (world[1] - world[0])
            .cross(&(world[2] - world[0]))
            .try_normalize(f32::EPSILON)
        else {
            return; // Degenerate face
        };
        // Both sides of a face are visible
        if normal.dot(view) < 0.0 {
            normal = -normal;
        }

        let mut screen = [ScreenPoint {
            x: 0.0,
            y: 0.0,
            depth: 0.0,
        }; 3];
        for (slot, point) in screen.iter_mut().zip(&world) {
            match Camera::project_to_screen(
                view_projection,
                point,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *slot = projected,
                None => return, // Triangle is clipped
            }
        }

        let shade = shade(material, &normal, light, view);
        let cell = Cell {
            character: shade.character(),
            rgb: shade.rgb,
        };
        self.rasterize_triangle(&screen, cell);
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint; 3], cell: Cell) {
        let [v0, v1, v2] = *coords;

        // Bounding box, clipped to screen bounds
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i32;
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(self.width as i32 - 1);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i32;
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                let Some((w0, w1, w2)) = barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Write the frame starting at terminal row `top`.
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(MoveTo(0, top + y as u16))?;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                let [r, g, b] = cell.rgb;
                writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
