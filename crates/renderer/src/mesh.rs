//! GPU meshes and the upload seam used by scene construction.

use crate::vertex::Vertex;
use wgpu::util::DeviceExt;

/// Creates render geometry from CPU vertex data.
///
/// Scene fields are generic over the uploader so they can be built against the
/// GPU renderer or an in-memory [`crate::Recorder`]. The returned handle owns the
/// resource; dropping it releases it.
pub trait MeshUploader {
    type Mesh;

    /// Upload a mesh. `None` means a plain triangle list; an indexed mesh
    /// with no indices draws nothing.
    fn upload_mesh(&mut self, label: &str, vertices: &[Vertex], indices: Option<&[u32]>) -> Self::Mesh;
}

/// A GPU mesh with a vertex buffer and an optional index buffer.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    /// Vertices or indices consumed by one draw.
    pub element_count: u32,
}

impl Mesh {
    /// Create a mesh from vertex and index data.
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: Option<&[u32]>) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = indices.filter(|i| !i.is_empty()).map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        Self {
            vertex_buffer,
            index_buffer,
            element_count: draw_element_count(vertices.len(), indices),
        }
    }

    /// Record this mesh into a render pass.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.element_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(index_buffer) => {
                pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.element_count, 0, 0..1);
            }
            None => pass.draw(0..self.element_count, 0..1),
        }
    }
}

/// Elements one draw consumes: every index when indexed, otherwise every vertex.
fn draw_element_count(vertex_count: usize, indices: Option<&[u32]>) -> u32 {
    indices.map_or(vertex_count, <[u32]>::len) as u32
}
