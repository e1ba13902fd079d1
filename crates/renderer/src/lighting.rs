//! Light sources and their per-frame aggregation into shader uniforms.
//!
//! Lights are owned by whatever produced them (the star field, the ship). Each
//! frame [`FrameLighting`] borrows them, derives the directional light from the
//! current sky colour, and writes everything under the shader's uniform names.

use crate::shading::ShadingContext;
use glam::Vec3;

/// Distance falloff: `1 / (constant + linear*d + quadratic*d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub const fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// Attenuation factor at distance `d`.
    pub fn factor(&self, d: f32) -> f32 {
        1.0 / (self.constant + self.linear * d + self.quadratic * d * d)
    }
}

/// Falloff used for star light (reach ~160 units).
pub const STAR_ATTENUATION: Attenuation = Attenuation::new(1.0, 0.027, 0.0028);
/// Falloff used for the ship's spotlight.
pub const SPOTLIGHT_ATTENUATION: Attenuation = Attenuation::new(1.0, 0.014, 0.0007);

/// Omnidirectional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
}

impl PointLight {
    /// Light emitted by a star of the given colour.
    pub fn from_star(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            ambient: 0.1 * color,
            diffuse: 0.5 * color,
            specular: color,
            attenuation: STAR_ATTENUATION,
        }
    }

    fn apply<C: ShadingContext + ?Sized>(&self, index: usize, ctx: &mut C) {
        let prefix = format!("pointLights[{index}].");
        ctx.set_vec3(&format!("{prefix}position"), self.position);
        ctx.set_vec3(&format!("{prefix}ambient"), self.ambient);
        ctx.set_vec3(&format!("{prefix}diffuse"), self.diffuse);
        ctx.set_vec3(&format!("{prefix}specular"), self.specular);
        ctx.set_float(&format!("{prefix}constant"), self.attenuation.constant);
        ctx.set_float(&format!("{prefix}linear"), self.attenuation.linear);
        ctx.set_float(&format!("{prefix}quadratic"), self.attenuation.quadratic);
    }
}

/// Spotlight ("caster") with a cone between `cut_off` and `outer_cut_off` degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CasterLight {
    pub position: Vec3,
    /// Unit vector.
    pub direction: Vec3,
    pub cut_off: f32,
    pub outer_cut_off: f32,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
}

impl Default for CasterLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::Z,
            cut_off: Spotlight::DEFAULT_CUT_OFF,
            outer_cut_off: Spotlight::DEFAULT_CUT_OFF + Spotlight::CUT_OFF_SPREAD,
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            attenuation: SPOTLIGHT_ATTENUATION,
        }
    }
}

impl CasterLight {
    /// Cutoffs go to the shader as cosines, not degrees.
    fn apply<C: ShadingContext + ?Sized>(&self, ctx: &mut C) {
        ctx.set_vec3("casterLight.position", self.position);
        ctx.set_vec3("casterLight.direction", self.direction);
        ctx.set_float("casterLight.cutOff", self.cut_off.to_radians().cos());
        ctx.set_float("casterLight.outerCutOff", self.outer_cut_off.to_radians().cos());
        ctx.set_vec3("casterLight.ambient", self.ambient);
        ctx.set_vec3("casterLight.diffuse", self.diffuse);
        ctx.set_vec3("casterLight.specular", self.specular);
        ctx.set_float("casterLight.constant", self.attenuation.constant);
        ctx.set_float("casterLight.linear", self.attenuation.linear);
        ctx.set_float("casterLight.quadratic", self.attenuation.quadratic);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotlightTurn {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotlightResize {
    Grow,
    Shrink,
}

/// A caster light aimed by yaw/pitch and resized in fixed steps.
#[derive(Debug, Clone)]
pub struct Spotlight {
    light: CasterLight,
    yaw: f32,
    pitch: f32,
}

impl Default for Spotlight {
    fn default() -> Self {
        Self::new()
    }
}

impl Spotlight {
    pub const DEFAULT_CUT_OFF: f32 = 12.5;
    pub const CUT_OFF_SPREAD: f32 = 10.0;
    pub const MAX_CUT_OFF: f32 = 45.0;
    pub const RESIZE_STEP: f32 = 0.5;
    /// Degrees per rotate command.
    pub const TURN_STEP: f32 = 0.1;

    /// Aimed straight down +Z.
    pub fn new() -> Self {
        Self {
            light: CasterLight::default(),
            yaw: -90.0,
            pitch: 0.0,
        }
    }

    pub fn light(&self) -> &CasterLight {
        &self.light
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.light.position = position;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn rotate(&mut self, turn: SpotlightTurn) {
        match turn {
            SpotlightTurn::Right => self.yaw += Self::TURN_STEP,
            SpotlightTurn::Left => self.yaw -= Self::TURN_STEP,
            SpotlightTurn::Up => self.pitch -= Self::TURN_STEP,
            SpotlightTurn::Down => self.pitch += Self::TURN_STEP,
        }
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.light.direction = -front.normalize();
    }

    /// Grow or shrink the cone, keeping the inner cutoff in `[RESIZE_STEP, MAX_CUT_OFF]`.
    pub fn resize(&mut self, resize: SpotlightResize) {
        let cut_off = match resize {
            SpotlightResize::Grow => (self.light.cut_off + Self::RESIZE_STEP).min(Self::MAX_CUT_OFF),
            SpotlightResize::Shrink => (self.light.cut_off - Self::RESIZE_STEP).max(Self::RESIZE_STEP),
        };
        self.light.cut_off = cut_off;
        self.light.outer_cut_off = cut_off + Self::CUT_OFF_SPREAD;
    }
}

/// Global light strengths; the colour comes from the sky each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingSettings {
    pub sun_direction: Vec3,
    pub ambient_strength: f32,
    pub diffuse_strength: f32,
    pub specular_strength: f32,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            sun_direction: Vec3::new(0.0, -1.0, 0.0),
            ambient_strength: 0.05,
            diffuse_strength: 0.4,
            specular_strength: 0.5,
        }
    }
}

/// Sun light derived from the sky colour. Not stored between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl DirectionalLight {
    pub fn from_sky(settings: &LightingSettings, sky_color: Vec3) -> Self {
        Self {
            direction: settings.sun_direction,
            ambient: settings.ambient_strength * sky_color,
            diffuse: settings.diffuse_strength * sky_color,
            specular: settings.specular_strength * sky_color,
        }
    }

    fn apply<C: ShadingContext + ?Sized>(&self, ctx: &mut C) {
        ctx.set_vec3("directionalLight.direction", self.direction);
        ctx.set_vec3("directionalLight.ambient", self.ambient);
        ctx.set_vec3("directionalLight.diffuse", self.diffuse);
        ctx.set_vec3("directionalLight.specular", self.specular);
    }
}

/// Every light active this frame, borrowed from its owners.
#[derive(Debug, Clone, Copy)]
pub struct FrameLighting<'a> {
    pub point_lights: &'a [PointLight],
    pub caster: &'a CasterLight,
    pub directional: DirectionalLight,
}

impl<'a> FrameLighting<'a> {
    pub fn collect(
        point_lights: &'a [PointLight],
        caster: &'a CasterLight,
        settings: &LightingSettings,
        sky_color: Vec3,
    ) -> Self {
        Self {
            point_lights,
            caster,
            directional: DirectionalLight::from_sky(settings, sky_color),
        }
    }

    pub fn apply<C: ShadingContext + ?Sized>(&self, ctx: &mut C) {
        for (index, light) in self.point_lights.iter().enumerate() {
            light.apply(index, ctx);
        }
        self.caster.apply(ctx);
        self.directional.apply(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shading::Recorder;

    #[test]
    fn grow_never_exceeds_max() {
        let mut spot = Spotlight::new();
        for _ in 0..200 {
            spot.resize(SpotlightResize::Grow);
            assert!(spot.light().cut_off <= Spotlight::MAX_CUT_OFF);
        }
        assert_eq!(spot.light().cut_off, Spotlight::MAX_CUT_OFF);
        assert_eq!(spot.light().outer_cut_off, Spotlight::MAX_CUT_OFF + Spotlight::CUT_OFF_SPREAD);
    }

    #[test]
    fn shrink_never_drops_below_step() {
        let mut spot = Spotlight::new();
        for _ in 0..200 {
            spot.resize(SpotlightResize::Shrink);
            assert!(spot.light().cut_off >= Spotlight::RESIZE_STEP);
        }
        assert_eq!(spot.light().cut_off, Spotlight::RESIZE_STEP);
    }

    #[test]
    fn rotation_keeps_direction_unit() {
        let mut spot = Spotlight::new();
        for turn in [SpotlightTurn::Left, SpotlightTurn::Up, SpotlightTurn::Up, SpotlightTurn::Right] {
            spot.rotate(turn);
            assert!((spot.light().direction.length() - 1.0).abs() < 1e-5);
        }
        assert!((spot.pitch() + 0.2).abs() < 1e-5);
        assert!((spot.yaw() + 90.0).abs() < 1e-4);
    }

    #[test]
    fn initial_aim_matches_default_direction() {
        let mut spot = Spotlight::new();
        spot.rotate(SpotlightTurn::Right);
        spot.rotate(SpotlightTurn::Left);
        assert!((spot.light().direction - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn directional_tracks_sky() {
        let settings = LightingSettings::default();
        let light = DirectionalLight::from_sky(&settings, Vec3::splat(0.5));
        assert_eq!(light.ambient, Vec3::splat(0.025));
        assert_eq!(light.diffuse, Vec3::splat(0.2));
        assert_eq!(light.specular, Vec3::splat(0.25));
        let dark = DirectionalLight::from_sky(&settings, Vec3::ZERO);
        assert_eq!(dark.diffuse, Vec3::ZERO);
    }

    #[test]
    fn aggregation_writes_every_light() {
        let lights = [
            PointLight::from_star(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE),
            PointLight::from_star(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(0.5)),
        ];
        let caster = CasterLight::default();
        let mut rec = Recorder::new();
        FrameLighting::collect(&lights, &caster, &LightingSettings::default(), Vec3::ONE).apply(&mut rec);

        for i in 0..2 {
            for field in ["position", "ambient", "diffuse", "specular", "constant", "linear", "quadratic"] {
                assert!(rec.has_uniform(&format!("pointLights[{i}].{field}")), "pointLights[{i}].{field}");
            }
        }
        assert_eq!(rec.vec3("pointLights[1].diffuse"), Some(Vec3::splat(0.25)));
        assert_eq!(rec.float("pointLights[0].linear"), Some(0.027));

        let cut_off = rec.float("casterLight.cutOff").unwrap();
        assert!((cut_off - 12.5f32.to_radians().cos()).abs() < 1e-6);
        let outer = rec.float("casterLight.outerCutOff").unwrap();
        assert!(outer < cut_off, "outer cone must have the smaller cosine");

        assert_eq!(rec.vec3("directionalLight.direction"), Some(Vec3::new(0.0, -1.0, 0.0)));
        assert_eq!(rec.vec3("directionalLight.diffuse"), Some(Vec3::splat(0.4)));
    }

    #[test]
    fn attenuation_is_one_at_source() {
        assert_eq!(STAR_ATTENUATION.factor(0.0), 1.0);
        assert!(STAR_ATTENUATION.factor(50.0) < 0.2);
    }
}
