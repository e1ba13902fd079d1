//! GPU-side uniform blocks and the routing from named uniforms into them.
//!
//! Layouts must match `shaders/scene.wgsl`.

use crate::shading::UniformValue;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Point lights the scene shader can take in one frame.
pub const MAX_POINT_LIGHTS: usize = 4;
/// Byte distance between per-object blocks (the common dynamic offset alignment).
pub const OBJECT_UNIFORM_STRIDE: wgpu::BufferAddress = 256;
/// Draws the object buffer can hold in one frame.
pub const MAX_OBJECTS_PER_FRAME: usize = 1024;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 3],
    pub constant: f32,
    pub ambient: [f32; 3],
    pub linear: f32,
    pub diffuse: [f32; 3],
    pub quadratic: f32,
    pub specular: [f32; 3],
    pub _pad: f32,
}

impl PointLightUniform {
    fn set(&mut self, field: &str, value: UniformValue) -> bool {
        match (field, value) {
            ("position", UniformValue::Vec3(v)) => self.position = v.to_array(),
            ("ambient", UniformValue::Vec3(v)) => self.ambient = v.to_array(),
            ("diffuse", UniformValue::Vec3(v)) => self.diffuse = v.to_array(),
            ("specular", UniformValue::Vec3(v)) => self.specular = v.to_array(),
            ("constant", UniformValue::Float(f)) => self.constant = f,
            ("linear", UniformValue::Float(f)) => self.linear = f,
            ("quadratic", UniformValue::Float(f)) => self.quadratic = f,
            _ => return false,
        }
        true
    }
}

/// Spotlight block. Cutoffs are cosines.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CasterLightUniform {
    pub position: [f32; 3],
    pub cut_off: f32,
    pub direction: [f32; 3],
    pub outer_cut_off: f32,
    pub ambient: [f32; 3],
    pub constant: f32,
    pub diffuse: [f32; 3],
    pub linear: f32,
    pub specular: [f32; 3],
    pub quadratic: f32,
}

impl CasterLightUniform {
    fn set(&mut self, field: &str, value: UniformValue) -> bool {
        match (field, value) {
            ("position", UniformValue::Vec3(v)) => self.position = v.to_array(),
            ("direction", UniformValue::Vec3(v)) => self.direction = v.to_array(),
            ("ambient", UniformValue::Vec3(v)) => self.ambient = v.to_array(),
            ("diffuse", UniformValue::Vec3(v)) => self.diffuse = v.to_array(),
            ("specular", UniformValue::Vec3(v)) => self.specular = v.to_array(),
            ("cutOff", UniformValue::Float(f)) => self.cut_off = f,
            ("outerCutOff", UniformValue::Float(f)) => self.outer_cut_off = f,
            ("constant", UniformValue::Float(f)) => self.constant = f,
            ("linear", UniformValue::Float(f)) => self.linear = f,
            ("quadratic", UniformValue::Float(f)) => self.quadratic = f,
            _ => return false,
        }
        true
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    pub direction: [f32; 3],
    pub _pad0: f32,
    pub ambient: [f32; 3],
    pub _pad1: f32,
    pub diffuse: [f32; 3],
    pub _pad2: f32,
    pub specular: [f32; 3],
    pub _pad3: f32,
}

impl DirectionalLightUniform {
    fn set(&mut self, field: &str, value: UniformValue) -> bool {
        let UniformValue::Vec3(v) = value else {
            return false;
        };
        match field {
            "direction" => self.direction = v.to_array(),
            "ambient" => self.ambient = v.to_array(),
            "diffuse" => self.diffuse = v.to_array(),
            "specular" => self.specular = v.to_array(),
            _ => return false,
        }
        true
    }
}

/// Everything shared by the draws of one frame (group 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_pos: [f32; 3],
    pub fog_density: f32,
    pub sky_color: [f32; 3],
    /// 0 or 1.
    pub blinn: u32,
    pub point_light_count: u32,
    pub _pad: [u32; 3],
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    pub caster: CasterLightUniform,
    pub directional: DirectionalLightUniform,
}

impl Default for FrameUniform {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            ..Zeroable::zeroed()
        }
    }
}

impl FrameUniform {
    /// Store a named uniform. Returns `false` if the name is not a frame uniform
    /// or the value has the wrong type.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        match (name, value) {
            ("view", UniformValue::Mat4(m)) => self.view = m.to_cols_array_2d(),
            ("projection", UniformValue::Mat4(m)) => self.projection = m.to_cols_array_2d(),
            ("viewPos", UniformValue::Vec3(v)) => self.view_pos = v.to_array(),
            ("fog_density", UniformValue::Float(f)) => self.fog_density = f,
            ("skyColor", UniformValue::Vec3(v)) => self.sky_color = v.to_array(),
            ("blinn", UniformValue::Bool(b)) => self.blinn = b as u32,
            _ => return self.set_light(name, value),
        }
        true
    }

    fn set_light(&mut self, name: &str, value: UniformValue) -> bool {
        if let Some(field) = name.strip_prefix("casterLight.") {
            return self.caster.set(field, value);
        }
        if let Some(field) = name.strip_prefix("directionalLight.") {
            return self.directional.set(field, value);
        }
        let Some((index, field)) = parse_point_light(name) else {
            return false;
        };
        let Some(light) = self.point_lights.get_mut(index) else {
            return false;
        };
        let stored = light.set(field, value);
        if stored {
            self.point_light_count = self.point_light_count.max(index as u32 + 1);
        }
        stored
    }
}

/// Split `pointLights[i].field` into `(i, field)`.
fn parse_point_light(name: &str) -> Option<(usize, &str)> {
    let rest = name.strip_prefix("pointLights[")?;
    let (index, field) = rest.split_once("].")?;
    Some((index.parse().ok()?, field))
}

/// Per-draw block (group 1, dynamic offset), padded to the offset stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub object_color: [f32; 3],
    /// 0 or 1. Stars are drawn unlit.
    pub star: u32,
    pub _pad: [[f32; 4]; 11],
}

impl Default for ObjectUniform {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            object_color: Vec3::ONE.to_array(),
            ..Zeroable::zeroed()
        }
    }
}

impl ObjectUniform {
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        match (name, value) {
            ("model", UniformValue::Mat4(m)) => self.model = m.to_cols_array_2d(),
            ("objectColor", UniformValue::Vec3(v)) => self.object_color = v.to_array(),
            ("star", UniformValue::Bool(b)) => self.star = b as u32,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_sizes_match_shader_layout() {
        assert_eq!(std::mem::size_of::<PointLightUniform>(), 64);
        assert_eq!(std::mem::size_of::<CasterLightUniform>(), 80);
        assert_eq!(std::mem::size_of::<DirectionalLightUniform>(), 64);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 176 + 64 * MAX_POINT_LIGHTS + 80 + 64);
        assert_eq!(std::mem::size_of::<ObjectUniform>() as u64, OBJECT_UNIFORM_STRIDE);
    }

    #[test]
    fn routes_view_names() {
        let mut frame = FrameUniform::default();
        assert!(frame.set("fog_density", UniformValue::Float(0.3)));
        assert!(frame.set("blinn", UniformValue::Bool(true)));
        assert!(frame.set("viewPos", UniformValue::Vec3(Vec3::new(1.0, 2.0, 3.0))));
        assert_eq!(frame.fog_density, 0.3);
        assert_eq!(frame.blinn, 1);
        assert_eq!(frame.view_pos, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn routes_light_names() {
        let mut frame = FrameUniform::default();
        assert!(frame.set("pointLights[1].linear", UniformValue::Float(0.027)));
        assert!(frame.set("casterLight.cutOff", UniformValue::Float(0.9)));
        assert!(frame.set("directionalLight.direction", UniformValue::Vec3(-Vec3::Y)));
        assert_eq!(frame.point_lights[1].linear, 0.027);
        assert_eq!(frame.point_light_count, 2);
        assert_eq!(frame.caster.cut_off, 0.9);
        assert_eq!(frame.directional.direction, [0.0, -1.0, 0.0]);
    }

    #[test]
    fn rejects_unknown_or_mistyped() {
        let mut frame = FrameUniform::default();
        assert!(!frame.set("pointLights[9].position", UniformValue::Vec3(Vec3::ONE)));
        assert!(!frame.set("pointLights[x].position", UniformValue::Vec3(Vec3::ONE)));
        assert!(!frame.set("fog_density", UniformValue::Bool(true)));
        assert!(!frame.set("model", UniformValue::Mat4(Mat4::IDENTITY)));
        assert_eq!(frame.point_light_count, 0);

        let mut object = ObjectUniform::default();
        assert!(object.set("star", UniformValue::Bool(true)));
        assert!(!object.set("skyColor", UniformValue::Vec3(Vec3::ONE)));
        assert_eq!(object.star, 1);
    }
}
