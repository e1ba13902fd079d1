//! Randomized asteroid hulls built from a jittered cube.

use crate::mesh::MeshBuffer;
use crate::random::SeededRandom;
use glam::Vec3;

/// Range of each corner coordinate's magnitude.
pub const HULL_EXTENT: (f32, f32) = (0.7, 2.4);

/// Floats in every hull buffer: 12 triangles x 3 vertices x 6 floats.
pub const HULL_FLOAT_COUNT: usize = 216;

/// Corner index bits: 1 = +x, 2 = +y, 4 = +z.
const CORNER_COUNT: usize = 8;

/// Two triangles per cube face.
#[rustfmt::skip]
const HULL_TRIANGLES: [[usize; 3]; 12] = [
    [0, 3, 1], [0, 2, 3], // -z
    [0, 4, 6], [0, 6, 2], // -x
    [2, 6, 7], [2, 7, 3], // +y
    [3, 7, 5], [3, 5, 1], // +x
    [6, 4, 5], [6, 5, 7], // +z
    [4, 0, 1], [4, 1, 5], // -y
];

/// Draw one hull from `rng`.
///
/// Consumes 24 values (x, y, z for corners 0..8). Reusing the stream gives a new
/// shape on every call; a fresh stream with the same seed replays the sequence.
pub fn asteroid_hull(rng: &mut SeededRandom) -> MeshBuffer {
    let mut corners = [Vec3::ZERO; CORNER_COUNT];
    for (index, corner) in corners.iter_mut().enumerate() {
        let sign = |bit: usize| if index & bit != 0 { 1.0 } else { -1.0 };
        let x = sign(1) * rng.uniform(HULL_EXTENT);
        let y = sign(2) * rng.uniform(HULL_EXTENT);
        let z = sign(4) * rng.uniform(HULL_EXTENT);
        *corner = Vec3::new(x, y, z);
    }

    let mut mesh = MeshBuffer::new();
    mesh.vertices.reserve(HULL_FLOAT_COUNT);

    for [a, b, c] in HULL_TRIANGLES {
        let (v1, v2, v3) = (corners[a], corners[b], corners[c]);
        // flat shading: every vertex of the face carries the same normal
        let normal = (v2 - v1).cross(v3 - v1);
        mesh.push_vertex(v1, normal);
        mesh.push_vertex(v2, normal);
        mesh.push_vertex(v3, normal);
    }

    mesh
}
