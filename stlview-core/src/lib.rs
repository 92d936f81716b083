//! stlview core - binary STL decoding and render parameter controls
//!
//! Decodes a binary STL file into an immutable [`Mesh`] and models the
//! discrete controls (color, opacity, lighting) that drive a [`Renderer`]
//! through [`RenderUpdate`]s.

pub mod color;
pub mod config;
pub mod control;
pub mod error;
pub mod mesh;
pub mod params;
pub mod projection;
pub mod render;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use color::{ColorName, NamedColor};
pub use config::ViewerConfig;
pub use control::{BindingState, ControlBinding, ControlPanel, Selection};
pub use error::{ConfigError, DecodeError, LoadError, ParameterError};
pub use mesh::{Bounds, Mesh, Triangle, Vertex};
pub use params::{ParameterName, ParameterSet, ParameterValue};
pub use projection::{Camera, ProjectionMode, ScreenPoint};
pub use render::{Lighting, Material, RenderUpdate, Renderer};
pub use stl::{AttributePolicy, StlDecoder};
pub use transform::RotationState;
