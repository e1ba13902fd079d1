//! Seeded fields of celestial bodies: planets, stars and asteroids.
//!
//! A field draws all of its bodies from one [`SeededRandom`] created from the
//! field's seed. Per body the draw order is x, y, z, the randomized colour
//! channels, then scale; asteroids follow with their 24 hull draws. That order is
//! part of the determinism contract: same seed and layout, same field.

use crate::asteroid::asteroid_hull;
use crate::mesh::MeshBuffer;
use crate::random::SeededRandom;
use glam::{Mat4, Vec3};

/// A body placed by a field. Immutable once generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialBody {
    pub position: Vec3,
    pub color: Vec3,
    pub scale: f32,
}

impl CelestialBody {
    /// Model matrix: uniform scale, then translation to `position`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// How a field colours its bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorRule {
    /// Red and green fixed, blue drawn from a narrow band.
    Banded { red: f32, green: f32, blue: (f32, f32) },
    /// Every channel drawn independently from the same band.
    Uniform((f32, f32)),
}

impl ColorRule {
    fn draw(&self, rng: &mut SeededRandom) -> Vec3 {
        match *self {
            ColorRule::Banded { red, green, blue } => Vec3::new(red, green, rng.uniform(blue)),
            ColorRule::Uniform(band) => {
                let r = rng.uniform(band);
                let g = rng.uniform(band);
                let b = rng.uniform(band);
                Vec3::new(r, g, b)
            }
        }
    }
}

/// Ranges a field samples its bodies from. Ranges are half-open `(lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayout {
    pub count: usize,
    pub x: (f32, f32),
    pub y: (f32, f32),
    pub z: (f32, f32),
    pub color: ColorRule,
    /// Often degenerate, e.g. `(1.0, 1.0)`.
    pub scale: (f32, f32),
}

impl FieldLayout {
    /// Planet spread used by the solar system scene.
    pub fn planets() -> Self {
        Self {
            count: 64,
            x: (-20.0, 20.0),
            y: (-20.0, 20.0),
            z: (-10.0, 100.0),
            color: ColorRule::Banded { red: 0.58, green: 0.3, blue: (0.05, 0.2) },
            scale: (1.0, 1.0),
        }
    }

    /// Two light-emitting stars near the start of the belt.
    pub fn stars() -> Self {
        Self {
            count: 2,
            x: (-10.0, 10.0),
            y: (-10.0, 10.0),
            z: (5.0, 20.0),
            color: ColorRule::Uniform((0.95, 1.0)),
            scale: (1.0, 1.0),
        }
    }

    /// Asteroid belt along the flight path.
    pub fn asteroids() -> Self {
        Self {
            count: 256,
            x: (-10.0, 10.0),
            y: (-10.0, 10.0),
            z: (-10.0, 100.0),
            color: ColorRule::Banded { red: 0.58, green: 0.3, blue: (0.05, 0.1) },
            scale: (0.1, 0.5),
        }
    }

    /// Same layout with a different body count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    fn draw_body(&self, rng: &mut SeededRandom) -> CelestialBody {
        let x = rng.uniform(self.x);
        let y = rng.uniform(self.y);
        let z = rng.uniform(self.z);
        let color = self.color.draw(rng);
        let scale = rng.uniform(self.scale);
        CelestialBody {
            position: Vec3::new(x, y, z),
            color,
            scale,
        }
    }
}

/// Planets or stars: bodies only, rendered with a shared sphere mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialField {
    pub seed: u64,
    pub bodies: Vec<CelestialBody>,
}

impl CelestialField {
    pub fn generate(seed: u64, layout: &FieldLayout) -> Self {
        let mut rng = SeededRandom::new(seed);
        let bodies = (0..layout.count).map(|_| layout.draw_body(&mut rng)).collect();
        log::debug!("Generated {} bodies from seed {}", layout.count, seed);
        Self { seed, bodies }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

/// One asteroid: its placement plus its own hull geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub body: CelestialBody,
    pub hull: MeshBuffer,
}

/// Asteroids share one stream, so consecutive hulls differ.
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidField {
    pub seed: u64,
    pub asteroids: Vec<Asteroid>,
}

impl AsteroidField {
    pub fn generate(seed: u64, layout: &FieldLayout) -> Self {
        let mut rng = SeededRandom::new(seed);
        let asteroids = (0..layout.count)
            .map(|_| {
                let body = layout.draw_body(&mut rng);
                let hull = asteroid_hull(&mut rng);
                Asteroid { body, hull }
            })
            .collect();
        log::debug!("Generated {} asteroids from seed {}", layout.count, seed);
        Self { seed, asteroids }
    }

    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }
}
