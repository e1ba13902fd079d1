//! Procedural generation for the solar system: seeded streams, sphere and
//! asteroid meshes, and the planet/star/asteroid fields.

pub mod asteroid;
pub mod field;
pub mod mesh;
pub mod random;
pub mod sphere;

pub use asteroid::*;
pub use field::*;
pub use mesh::*;
pub use random::*;
pub use sphere::*;
