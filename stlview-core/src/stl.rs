//! Binary STL decoder.
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector (ignored)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```
//!
//! All values are little-endian. Bytes after the last declared triangle are
//! ignored.
use std::path::Path;

use nom::{
    bytes::complete::take,
    combinator::map,
    number::complete::{le_f32, le_u16, le_u32},
    sequence::tuple,
    IResult,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{DecodeError, LoadError};
use crate::mesh::{Mesh, Vertex};

/// Size of the free-form header in bytes.
pub const HEADER_SIZE: usize = 80;

/// Size of one triangle record (normal + 3 vertices + attribute count).
pub const RECORD_SIZE: usize = 50;

// Parsers carry no error detail; failures are mapped to `DecodeError` by
// the caller, which knows where in the stream it is.
type Parsed<'a, T> = IResult<&'a [u8], T, ()>;

/// What to do with a record whose attribute byte count is nonzero.
///
/// The attribute payload itself is never read; records are always taken to
/// be exactly [`RECORD_SIZE`] bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributePolicy {
    /// Read the count and discard it.
    #[default]
    Ignore,
    /// Fail with [`DecodeError::UnsupportedAttributes`].
    Reject,
}

struct Record {
    corners: [Vertex; 3],
    attribute_bytes: u16,
}

fn vector3(input: &[u8]) -> Parsed<'_, [f32; 3]> {
    map(tuple((le_f32, le_f32, le_f32)), |(x, y, z)| [x, y, z])(input)
}

fn vertex(input: &[u8]) -> Parsed<'_, Vertex> {
    map(vector3, |[x, y, z]| Vertex::new(x, y, z))(input)
}

fn record(input: &[u8]) -> Parsed<'_, Record> {
    let (input, _normal) = vector3(input)?;
    let (input, (v0, v1, v2)) = tuple((vertex, vertex, vertex))(input)?;
    let (input, attribute_bytes) = le_u16(input)?;
    Ok((
        input,
        Record {
            corners: [v0, v1, v2],
            attribute_bytes,
        },
    ))
}

/// Binary STL decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct StlDecoder {
    attributes: AttributePolicy,
}

impl StlDecoder {
    /// A decoder that ignores attribute byte counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder that rejects records with a nonzero attribute byte count.
    pub fn strict() -> Self {
        Self::with_policy(AttributePolicy::Reject)
    }

    pub fn with_policy(attributes: AttributePolicy) -> Self {
        Self { attributes }
    }

    pub fn policy(&self) -> AttributePolicy {
        self.attributes
    }

    /// Decode a complete binary STL byte buffer into a [`Mesh`].
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Format`] if the header or triangle count is incomplete.
    /// - [`DecodeError::Truncated`] with the index of the first triangle
    ///   whose record is incomplete.
    /// - [`DecodeError::UnsupportedAttributes`] under [`AttributePolicy::Reject`].
    /// - [`DecodeError::IndexOverflow`] if the vertex indices of a triangle
    ///   would not fit in a `u32`.
    #[instrument(skip_all, fields(len = bytes.len(), policy = ?self.attributes))]
    pub fn decode(&self, bytes: &[u8]) -> Result<Mesh, DecodeError> {
        let (input, _header) = take::<_, _, ()>(HEADER_SIZE)(bytes).map_err(|_| {
            DecodeError::Format {
                reason: "header too short",
            }
        })?;
        let (mut input, triangle_count) =
            le_u32::<_, ()>(input).map_err(|_| DecodeError::Format {
                reason: "missing triangle count",
            })?;

        // The declared count is untrusted; only reserve what the buffer can hold.
        let capacity = (triangle_count as usize).min(input.len() / RECORD_SIZE);
        let mut mesh = Mesh::with_capacity(capacity);
        let mut ignored_attributes = 0usize;

        for triangle in 0..triangle_count {
            let (rest, parsed) =
                record(input).map_err(|_| DecodeError::Truncated { triangle })?;

            if parsed.attribute_bytes != 0 {
                match self.attributes {
                    AttributePolicy::Ignore => ignored_attributes += 1,
                    AttributePolicy::Reject => {
                        return Err(DecodeError::UnsupportedAttributes {
                            triangle,
                            count: parsed.attribute_bytes,
                        })
                    }
                }
            }

            mesh.push_triangle(parsed.corners)
                .ok_or(DecodeError::IndexOverflow { triangle })?;
            input = rest;
        }

        if ignored_attributes > 0 {
            warn!(
                records = ignored_attributes,
                "ignored nonzero attribute byte counts"
            );
        }
        if !input.is_empty() {
            debug!(trailing = input.len(), "ignoring bytes after last triangle");
        }

        info!(triangles = mesh.triangle_count(), "decoded binary STL");
        Ok(mesh)
    }

    /// Read and decode a binary STL file.
    ///
    /// The file is read in full and closed before decoding starts.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Mesh, LoadError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.decode(&data)?)
    }
}

/// Decode a binary STL buffer, ignoring attribute byte counts.
pub fn decode(bytes: &[u8]) -> Result<Mesh, DecodeError> {
    StlDecoder::new().decode(bytes)
}

/// Load a binary STL file, ignoring attribute byte counts.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
    StlDecoder::new().load(path)
}
