//! Scene pipelines, bind group layouts and the depth target.

use crate::uniforms::{FrameUniform, ObjectUniform};
use crate::vertex::Vertex;
use std::num::NonZeroU64;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const SCENE_SHADER: &str = include_str!("shaders/scene.wgsl");

/// Per-vertex (Gouraud) or per-fragment (Phong) lighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingModel {
    #[default]
    Phong,
    Gouraud,
}

impl ShadingModel {
    pub fn toggled(self) -> Self {
        match self {
            ShadingModel::Phong => ShadingModel::Gouraud,
            ShadingModel::Gouraud => ShadingModel::Phong,
        }
    }

    fn entry_points(self) -> (&'static str, &'static str) {
        match self {
            ShadingModel::Phong => ("vs_phong", "fs_phong"),
            ShadingModel::Gouraud => ("vs_gouraud", "fs_gouraud"),
        }
    }
}

/// Group 0: [`FrameUniform`].
pub fn create_frame_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Frame Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<FrameUniform>() as u64),
            },
            count: None,
        }],
    })
}

/// Group 1: [`ObjectUniform`] selected per draw with a dynamic offset.
pub fn create_object_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Object Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<ObjectUniform>() as u64),
            },
            count: None,
        }],
    })
}

/// Create a depth texture view matching the surface size.
pub fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Both lighting variants of the scene pipeline.
///
/// A pipeline is `None` when shader compilation or pipeline creation failed;
/// the error has been logged and draws with it are skipped.
pub struct ScenePipelines {
    phong: Option<wgpu::RenderPipeline>,
    gouraud: Option<wgpu::RenderPipeline>,
}

impl ScenePipelines {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
    ) -> Self {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER.into()),
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            log::error!("Scene shader failed to compile: {error}");
            return Self {
                phong: None,
                gouraud: None,
            };
        }

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        Self {
            phong: create_scene_pipeline(device, &layout, &shader, surface_format, ShadingModel::Phong),
            gouraud: create_scene_pipeline(device, &layout, &shader, surface_format, ShadingModel::Gouraud),
        }
    }

    pub fn get(&self, model: ShadingModel) -> Option<&wgpu::RenderPipeline> {
        match model {
            ShadingModel::Phong => self.phong.as_ref(),
            ShadingModel::Gouraud => self.gouraud.as_ref(),
        }
    }
}

fn create_scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    model: ShadingModel,
) -> Option<wgpu::RenderPipeline> {
    let (vertex_entry, fragment_entry) = model.entry_points();
    let label = format!("{model:?} Scene Pipeline");

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vertex_entry),
            buffers: &[Vertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Hull winding is not consistent.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => {
            log::error!("{label} creation failed: {error}");
            None
        }
        None => Some(pipeline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shading_model_toggles_back() {
        let model = ShadingModel::default();
        assert_eq!(model, ShadingModel::Phong);
        assert_eq!(model.toggled(), ShadingModel::Gouraud);
        assert_eq!(model.toggled().toggled(), model);
    }

    #[test]
    fn shader_declares_every_entry_point() {
        for model in [ShadingModel::Phong, ShadingModel::Gouraud] {
            let (vs, fs) = model.entry_points();
            assert!(SCENE_SHADER.contains(&format!("fn {vs}(")));
            assert!(SCENE_SHADER.contains(&format!("fn {fs}(")));
        }
    }
}
