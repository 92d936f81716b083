//! Binary STL fixtures.
#![allow(dead_code)]

pub type Face = [[f32; 3]; 3];

/// Encode `faces` as a binary STL whose header declares `declared` triangles.
pub fn encode_with_count(faces: &[Face], declared: u32) -> Vec<u8> {
    let mut data = b"binary STL fixture".to_vec();
    data.resize(80, b' ');
    data.extend_from_slice(&declared.to_le_bytes());
    for face in faces {
        // Normal: deliberately nonsense, decoders must ignore it
        for c in [f32::NAN, 7.0, -7.0] {
            data.extend_from_slice(&c.to_le_bytes());
        }
        for corner in face {
            for c in corner {
                data.extend_from_slice(&c.to_le_bytes());
            }
        }
        data.extend_from_slice(&0u16.to_le_bytes());
    }
    data
}

pub fn encode(faces: &[Face]) -> Vec<u8> {
    encode_with_count(faces, faces.len() as u32)
}

pub fn tetrahedron() -> Vec<Face> {
    let a = [0.0, 0.0, 0.0];
    let b = [1.0, 0.0, 0.0];
    let c = [0.0, 1.0, 0.0];
    let d = [0.0, 0.0, 1.0];
    vec![[a, c, b], [a, b, d], [a, d, c], [b, c, d]]
}
