//! The shading-context seam between scene code and whatever draws it.
//!
//! Scene code never touches GPU objects. It sets named uniforms and asks for
//! meshes to be drawn; the uniform names are the contract with the scene shader
//! and must be produced verbatim.

use crate::mesh::MeshUploader;
use crate::vertex::Vertex;
use glam::{Mat4, Vec3};
use std::collections::HashMap;

/// A typed uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Float(f32),
    Vec3(Vec3),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            UniformValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match *self {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mat4(&self) -> Option<Mat4> {
        match *self {
            UniformValue::Mat4(v) => Some(v),
            _ => None,
        }
    }
}

/// Uniform setters keyed by name plus draw submission.
///
/// Per-object uniforms (`model`, `objectColor`, `star`) apply to every `draw`
/// that follows until they are set again.
pub trait ShadingContext {
    type Mesh;

    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn draw(&mut self, mesh: &Self::Mesh);

    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }
}

/// Camera, fog and sky values shared by every draw in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewUniforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub view_position: Vec3,
    pub fog_density: f32,
    pub sky_color: Vec3,
    /// Blinn-Phong halfway-vector specular instead of Phong reflection.
    pub blinn: bool,
}

impl ViewUniforms {
    pub fn apply<C: ShadingContext + ?Sized>(&self, ctx: &mut C) {
        ctx.set_mat4("projection", self.projection);
        ctx.set_mat4("view", self.view);
        ctx.set_float("fog_density", self.fog_density);
        ctx.set_vec3("skyColor", self.sky_color);
        ctx.set_vec3("viewPos", self.view_position);
        ctx.set_bool("blinn", self.blinn);
    }
}

/// Geometry uploaded into a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMesh {
    pub id: usize,
    pub label: String,
    pub vertices: Vec<Vertex>,
    pub indices: Option<Vec<u32>>,
}

/// One draw as seen by a [`Recorder`], with the per-object uniforms at that moment.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub mesh: usize,
    pub label: String,
    pub model: Option<Mat4>,
    pub object_color: Option<Vec3>,
    pub star: Option<bool>,
}

/// In-memory shading context and mesh uploader.
///
/// Keeps the last value of every uniform and a log of draws. Used for headless
/// frames and to check the uniform contract in tests.
#[derive(Debug, Default)]
pub struct Recorder {
    uniforms: HashMap<String, UniformValue>,
    draws: Vec<DrawCall>,
    uploads: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.uniform(name)?.as_bool()
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.uniform(name)?.as_float()
    }

    pub fn vec3(&self, name: &str) -> Option<Vec3> {
        self.uniform(name)?.as_vec3()
    }

    pub fn mat4(&self, name: &str) -> Option<Mat4> {
        self.uniform(name)?.as_mat4()
    }

    pub fn has_uniform(&self, name: &str) -> bool {
        self.uniforms.contains_key(name)
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Meshes uploaded so far.
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    /// Forget draws and uniforms, keeping the upload counter.
    pub fn clear_frame(&mut self) {
        self.uniforms.clear();
        self.draws.clear();
    }
}

impl MeshUploader for Recorder {
    type Mesh = RecordedMesh;

    fn upload_mesh(&mut self, label: &str, vertices: &[Vertex], indices: Option<&[u32]>) -> RecordedMesh {
        let id = self.uploads;
        self.uploads += 1;
        RecordedMesh {
            id,
            label: label.to_string(),
            vertices: vertices.to_vec(),
            indices: indices.map(<[u32]>::to_vec),
        }
    }
}

impl ShadingContext for Recorder {
    type Mesh = RecordedMesh;

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.insert(name.to_string(), value);
    }

    fn draw(&mut self, mesh: &RecordedMesh) {
        let call = DrawCall {
            mesh: mesh.id,
            label: mesh.label.clone(),
            model: self.mat4("model"),
            object_color: self.vec3("objectColor"),
            star: self.bool("star"),
        };
        self.draws.push(call);
    }
}
