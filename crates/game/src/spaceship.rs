//! The spaceship: a loaded model on a fixed corkscrew path carrying the spotlight.

use engine_core::BoundingBox;
use glam::{Mat4, Vec3};
use renderer::{
    CameraTarget, MeshUploader, ModelData, ShadingContext, Spotlight, SpotlightResize, SpotlightTurn,
};

struct ShipPart<M> {
    mesh: M,
    color: Vec3,
}

pub struct Spaceship<M> {
    parts: Vec<ShipPart<M>>,
    /// Model-space bounds of the imported model.
    bounds: BoundingBox,
    /// Unscaled position along the trajectory.
    position: Vec3,
    /// Seconds since start; drives the orbit and the roll.
    elapsed: f32,
    spotlight: Spotlight,
}

impl<M> Spaceship<M> {
    pub const SPEED: Vec3 = Vec3::new(0.0, 0.0, 20.0);
    pub const ORBIT_RADIUS: f32 = 10.0;
    /// Model units to scene units.
    pub const SCALE: f32 = 0.01;

    /// Upload every primitive of `model`.
    pub fn new<U>(uploader: &mut U, model: &ModelData) -> Self
    where
        U: MeshUploader<Mesh = M> + ?Sized,
    {
        let parts = model
            .primitives
            .iter()
            .enumerate()
            .map(|(i, p)| ShipPart {
                mesh: uploader.upload_mesh(&format!("Spaceship {i}"), &p.vertices, p.indices.as_deref()),
                color: p.color,
            })
            .collect();

        let mut ship = Self {
            parts,
            bounds: model.bounds,
            position: Vec3::ZERO,
            elapsed: 0.0,
            spotlight: Spotlight::new(),
        };
        ship.spotlight.set_position(ship.light_position());
        ship
    }

    /// Advance along the path. `elapsed` is the total time since start.
    pub fn update(&mut self, dt: f32, elapsed: f32) {
        self.position += Self::SPEED * dt;
        self.position.x = elapsed.cos() * Self::ORBIT_RADIUS;
        self.position.y = elapsed.sin() * Self::ORBIT_RADIUS;
        self.elapsed = elapsed;
        self.spotlight.set_position(self.light_position());
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Scaled, then rolled about Z around the model's centre line, then placed.
    pub fn model_matrix(&self) -> Mat4 {
        let s = Self::SCALE;
        let pivot = Vec3::new(self.bounds.center().x * s, 0.0, 0.0);
        Mat4::from_translation(self.position * s)
            * Mat4::from_translation(pivot)
            * Mat4::from_rotation_z(self.elapsed / 10.0)
            * Mat4::from_translation(-pivot)
            * Mat4::from_scale(Vec3::splat(s))
    }

    /// Nose of the ship, where the spotlight sits.
    pub fn light_position(&self) -> Vec3 {
        let center = self.bounds.center();
        (Vec3::new(center.x, center.y, self.bounds.max.z) + self.position) * Self::SCALE
    }

    pub fn spotlight(&self) -> &Spotlight {
        &self.spotlight
    }

    pub fn turn_spotlight(&mut self, turn: SpotlightTurn) {
        self.spotlight.rotate(turn);
    }

    pub fn resize_spotlight(&mut self, resize: SpotlightResize) {
        self.spotlight.resize(resize);
    }

    pub fn render<C>(&self, ctx: &mut C)
    where
        C: ShadingContext<Mesh = M> + ?Sized,
    {
        ctx.set_bool("star", false);
        ctx.set_mat4("model", self.model_matrix());
        for part in &self.parts {
            ctx.set_vec3("objectColor", part.color);
            ctx.draw(&part.mesh);
        }
    }
}

impl<M> CameraTarget for Spaceship<M> {
    fn focus_point(&self) -> Vec3 {
        (self.bounds.center() + self.position) * Self::SCALE
    }

    fn mount_point(&self) -> Vec3 {
        let center = self.bounds.center();
        (Vec3::new(center.x, self.bounds.max.y, center.z) + self.position) * Self::SCALE
    }
}
