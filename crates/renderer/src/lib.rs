//! Scene rendering for Astronomy: camera, lighting, day/night sky, the
//! shading-context abstraction and its wgpu implementation.

pub mod camera;
pub mod lighting;
pub mod mesh;
pub mod model;
pub mod pipeline;
pub mod renderer;
pub mod shading;
pub mod sky;
pub mod uniforms;
pub mod vertex;

pub use camera::*;
pub use lighting::*;
pub use mesh::*;
pub use model::*;
pub use pipeline::*;
pub use renderer::*;
pub use shading::*;
pub use sky::*;
pub use uniforms::*;
pub use vertex::*;
