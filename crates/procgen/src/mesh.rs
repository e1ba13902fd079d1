//! CPU-side mesh buffers produced by the generators.

use glam::Vec3;
use thiserror::Error;

/// Floats per interleaved vertex: position (3) then normal (3).
pub const FLOATS_PER_VERTEX: usize = 6;

/// Geometry generation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("sphere tessellation needs at least one stack and one sector (got {stacks} x {sectors})")]
    InvalidTessellation { stacks: u32, sectors: u32 },
}

/// Interleaved position+normal vertices with optional triangle indices.
///
/// `None` means the buffer is drawn as a plain triangle list: every three
/// consecutive vertices form one triangle. An indexed buffer may hold zero
/// triangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    pub vertices: Vec<f32>,
    pub indices: Option<Vec<u32>>,
    /// Wireframe edges as index pairs. Only spheres fill this.
    pub line_indices: Vec<u32>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer that draws through an index list.
    pub fn indexed() -> Self {
        Self {
            indices: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Append one triangle to the index list, switching the buffer to indexed.
    pub fn push_triangle(&mut self, triangle: [u32; 3]) {
        self.indices.get_or_insert_with(Vec::new).extend_from_slice(&triangle);
    }

    /// Append one vertex.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.vertices.extend_from_slice(&position.to_array());
        self.vertices.extend_from_slice(&normal.to_array());
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    pub fn position(&self, vertex: usize) -> Vec3 {
        let base = vertex * FLOATS_PER_VERTEX;
        Vec3::from_slice(&self.vertices[base..base + 3])
    }

    pub fn normal(&self, vertex: usize) -> Vec3 {
        let base = vertex * FLOATS_PER_VERTEX + 3;
        Vec3::from_slice(&self.vertices[base..base + 3])
    }

    /// Vertex indices of every triangle, whether or not the buffer is indexed.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let count = self.triangle_count();
        (0..count).map(move |t| match &self.indices {
            Some(indices) => [indices[t * 3], indices[t * 3 + 1], indices[t * 3 + 2]],
            None => {
                let base = (t * 3) as u32;
                [base, base + 1, base + 2]
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_vertex_interleaves() {
        let mut mesh = MeshBuffer::new();
        mesh.push_vertex(Vec3::new(1.0, 2.0, 3.0), Vec3::Z);
        assert_eq!(mesh.vertices, vec![1.0, 2.0, 3.0, 0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.position(0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.normal(0), Vec3::Z);
    }

    #[test]
    fn unindexed_triangles_are_consecutive() {
        let mut mesh = MeshBuffer::new();
        for _ in 0..6 {
            mesh.push_vertex(Vec3::ZERO, Vec3::Y);
        }
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn indexed_buffer_without_triangles_has_none() {
        let mut mesh = MeshBuffer::indexed();
        for _ in 0..6 {
            mesh.push_vertex(Vec3::ZERO, Vec3::Y);
        }
        assert!(mesh.is_indexed());
        assert_eq!(mesh.triangle_count(), 0);
        assert_eq!(mesh.triangles().count(), 0);
    }

    #[test]
    fn push_triangle_switches_to_indexed() {
        let mut mesh = MeshBuffer::new();
        assert!(!mesh.is_indexed());
        mesh.push_triangle([2, 1, 0]);
        assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[2, 1, 0]]);
    }
}
