//! UV sphere tessellation.
//!
//! Stacks run from the north pole (+Z) to the south pole, sectors wind around
//! the Z axis. The first and last stacks collapse to a point, so they contribute
//! one triangle per quad instead of two.

use crate::mesh::{MeshBuffer, MeshError};
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Tessellation used for planets and stars.
pub const DEFAULT_STACKS: u32 = 32;
pub const DEFAULT_SECTORS: u32 = 32;

/// Build a unit UV sphere. Normals equal positions.
pub fn uv_sphere(stacks: u32, sectors: u32) -> Result<MeshBuffer, MeshError> {
    if stacks == 0 || sectors == 0 {
        return Err(MeshError::InvalidTessellation { stacks, sectors });
    }

    let sector_step = TAU / sectors as f32;
    let stack_step = PI / stacks as f32;
    let ring = sectors + 1;

    let mut mesh = MeshBuffer::indexed();
    mesh.vertices
        .reserve(((stacks + 1) * ring) as usize * crate::mesh::FLOATS_PER_VERTEX);

    for i in 0..=stacks {
        let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
        let xy = stack_angle.cos();
        let z = stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = j as f32 * sector_step;
            let position = Vec3::new(xy * sector_angle.cos(), xy * sector_angle.sin(), z);
            mesh.push_vertex(position, position);
        }
    }

    for i in 0..stacks {
        let mut k1 = i * ring;
        let mut k2 = k1 + ring;

        for _ in 0..sectors {
            if i != 0 {
                mesh.push_triangle([k1, k2, k1 + 1]);
            }
            if i != stacks - 1 {
                mesh.push_triangle([k1 + 1, k2, k2 + 1]);
            }

            // vertical edge always, horizontal edge except along the north pole
            mesh.line_indices.extend_from_slice(&[k1, k2]);
            if i != 0 {
                mesh.line_indices.extend_from_slice(&[k1, k1 + 1]);
            }

            k1 += 1;
            k2 += 1;
        }
    }

    log::debug!(
        "uv_sphere {}x{}: {} vertices, {} triangles",
        stacks,
        sectors,
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_triangle_counts_match_formula() {
        for (stacks, sectors) in [(1, 1), (2, 3), (8, 5), (32, 32)] {
            let mesh = uv_sphere(stacks, sectors).unwrap();
            let expected_vertices = ((stacks + 1) * (sectors + 1)) as usize;
            let expected_triangles = (2 * sectors * stacks - 2 * sectors) as usize;
            assert_eq!(mesh.vertex_count(), expected_vertices, "{stacks}x{sectors}");
            assert_eq!(mesh.triangle_count(), expected_triangles, "{stacks}x{sectors}");
            assert!(mesh.is_indexed());
        }
    }

    #[test]
    fn single_stack_sphere_has_no_triangles() {
        // both pole rules skip every quad
        let mesh = uv_sphere(1, 4).unwrap();
        assert_eq!(mesh.indices.as_deref(), Some(&[][..]));
        assert_eq!(mesh.triangle_count(), 0);
        assert_eq!(mesh.triangles().count(), 0);
    }

    #[test]
    fn normals_are_unit_length() {
        let mesh = uv_sphere(DEFAULT_STACKS, DEFAULT_SECTORS).unwrap();
        for v in 0..mesh.vertex_count() {
            let len = mesh.normal(v).length();
            assert!((len - 1.0).abs() < 1e-5, "normal {v} has length {len}");
            assert_eq!(mesh.normal(v), mesh.position(v));
        }
    }

    #[test]
    fn indices_stay_in_bounds() {
        let mesh = uv_sphere(6, 9).unwrap();
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().flatten().all(|&i| i < count));
        assert!(mesh.line_indices.iter().all(|&i| i < count));
    }

    #[test]
    fn first_vertex_is_north_pole() {
        let mesh = uv_sphere(4, 4).unwrap();
        let pole = mesh.position(0);
        assert!((pole - Vec3::Z).length() < 1e-6);
        let south = mesh.position(mesh.vertex_count() - 1);
        assert!((south.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn wireframe_skips_horizontal_edges_on_first_stack() {
        let (stacks, sectors) = (4, 6);
        let mesh = uv_sphere(stacks, sectors).unwrap();
        let vertical = stacks * sectors;
        let horizontal = (stacks - 1) * sectors;
        assert_eq!(mesh.line_indices.len() as u32, 2 * (vertical + horizontal));
    }

    #[test]
    fn zero_tessellation_is_rejected() {
        assert_eq!(
            uv_sphere(0, 8),
            Err(MeshError::InvalidTessellation { stacks: 0, sectors: 8 })
        );
        assert!(uv_sphere(8, 0).is_err());
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(uv_sphere(12, 7).unwrap(), uv_sphere(12, 7).unwrap());
    }
}
