//! Vertex layout shared by every mesh in the scene.

use bytemuck::{Pod, Zeroable};

/// Position + normal, matching the generators' six-float interleaving.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Reinterpret an interleaved `[px, py, pz, nx, ny, nz, ...]` buffer.
    ///
    /// Trailing floats that do not complete a vertex are ignored.
    pub fn slice_from_floats(floats: &[f32]) -> &[Vertex] {
        let whole = floats.len() - floats.len() % 6;
        bytemuck::cast_slice(&floats[..whole])
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
