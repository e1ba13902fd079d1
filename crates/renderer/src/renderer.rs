//! Main renderer managing wgpu state and the scene pass.

use crate::{
    mesh::{Mesh, MeshUploader},
    pipeline::{
        create_depth_view, create_frame_bind_group_layout, create_object_bind_group_layout,
        ScenePipelines, ShadingModel,
    },
    shading::{ShadingContext, UniformValue},
    uniforms::{FrameUniform, ObjectUniform, MAX_OBJECTS_PER_FRAME, OBJECT_UNIFORM_STRIDE},
    vertex::Vertex,
};
use anyhow::{Context, Result};
use glam::Vec3;
use std::num::NonZeroU64;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Main renderer state.
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    pipelines: ScenePipelines,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,

    depth_view: wgpu::TextureView,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("Failed to create device")?;

        device.on_uncaptured_error(Box::new(|error: wgpu::Error| {
            log::error!("Uncaptured GPU error: {error}");
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;

        let present_mode = if vsync {
            surface_caps
                .present_modes
                .iter()
                .find(|m| matches!(m, wgpu::PresentMode::Mailbox))
                .copied()
                .unwrap_or(wgpu::PresentMode::AutoVsync)
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let frame_bind_group_layout = create_frame_bind_group_layout(&device);
        let object_bind_group_layout = create_object_bind_group_layout(&device);

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::cast_slice(&[FrameUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let object_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniform Buffer"),
            size: OBJECT_UNIFORM_STRIDE * MAX_OBJECTS_PER_FRAME as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &object_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &object_buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
        });

        let pipelines = ScenePipelines::new(
            &device,
            surface_format,
            &[&frame_bind_group_layout, &object_bind_group_layout],
        );

        let depth_view = create_depth_view(&device, config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            pipelines,
            frame_buffer,
            frame_bind_group,
            object_buffer,
            object_bind_group,
            depth_view,
        })
    }

    /// Handle window resize.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.reconfigure();
        }
    }

    /// Reconfigure the surface at its current size (after `Lost`/`Outdated`).
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, self.config.width, self.config.height);
    }

    /// Get window dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Clear to `clear_color`, let `record` issue uniforms and draws, then present.
    ///
    /// Uniform buffers are uploaded once recording finishes, so the last value
    /// of each frame-level uniform wins for every draw in the frame.
    pub fn render_scene<F>(
        &mut self,
        clear_color: Vec3,
        shading: ShadingModel,
        record: F,
    ) -> std::result::Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&mut ScenePass<'_>),
    {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        let (frame, objects) = {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear_color.x as f64,
                            g: clear_color.y as f64,
                            b: clear_color.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let pipeline = self.pipelines.get(shading);
            if let Some(pipeline) = pipeline {
                pass.set_pipeline(pipeline);
            }
            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            let mut scene = ScenePass {
                pass,
                enabled: pipeline.is_some(),
                object_bind_group: &self.object_bind_group,
                frame: FrameUniform::default(),
                current: ObjectUniform::default(),
                objects: Vec::new(),
                overflowed: false,
            };
            record(&mut scene);
            (scene.frame, scene.objects)
        };

        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[frame]));
        if !objects.is_empty() {
            self.queue
                .write_buffer(&self.object_buffer, 0, bytemuck::cast_slice(&objects));
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl MeshUploader for Renderer {
    type Mesh = Mesh;

    fn upload_mesh(&mut self, label: &str, vertices: &[Vertex], indices: Option<&[u32]>) -> Mesh {
        Mesh::new(&self.device, label, vertices, indices)
    }
}

/// The wgpu shading context for one frame.
///
/// Frame uniforms collect into a [`FrameUniform`]; every draw snapshots the
/// current per-object values into its own slot of the object buffer.
pub struct ScenePass<'a> {
    pass: wgpu::RenderPass<'a>,
    /// False when the pipeline failed to build; draws are then skipped.
    enabled: bool,
    object_bind_group: &'a wgpu::BindGroup,
    frame: FrameUniform,
    current: ObjectUniform,
    objects: Vec<ObjectUniform>,
    overflowed: bool,
}

impl ShadingContext for ScenePass<'_> {
    type Mesh = Mesh;

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if !self.current.set(name, value) && !self.frame.set(name, value) {
            log::trace!("Ignoring uniform {name} = {value:?}");
        }
    }

    fn draw(&mut self, mesh: &Mesh) {
        if !self.enabled {
            return;
        }
        if self.objects.len() >= MAX_OBJECTS_PER_FRAME {
            if !self.overflowed {
                log::warn!("More than {MAX_OBJECTS_PER_FRAME} draws in one frame; dropping the rest");
                self.overflowed = true;
            }
            return;
        }

        let offset = self.objects.len() as u64 * OBJECT_UNIFORM_STRIDE;
        self.objects.push(self.current);
        self.pass
            .set_bind_group(1, self.object_bind_group, &[offset as wgpu::DynamicOffset]);
        mesh.draw(&mut self.pass);
    }
}
