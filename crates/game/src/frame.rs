//! Per-frame state shared across the loop: clock, sky, fog, toggles, camera.

use crate::config::{AppConfig, FogConfig};
use crate::scene::SolarSystem;
use engine_core::{Clock, FpsCounter};
use glam::Vec2;
use input::Command;
use renderer::{
    CameraController, CameraMovement, CameraRig, DayNightCycle, FrameLighting, LightingSettings,
    ShadingContext, ShadingModel, SkyError, SpotlightResize, SpotlightTurn, ViewUniforms,
};

/// Exponential fog density, nudged while a fog key is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    density: f32,
    step: f32,
}

impl Fog {
    pub const MIN_DENSITY: f32 = 0.0;
    pub const MAX_DENSITY: f32 = 1.0;

    pub fn new(config: &FogConfig) -> Self {
        Self {
            density: config.density.clamp(Self::MIN_DENSITY, Self::MAX_DENSITY),
            step: config.step,
        }
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn thicken(&mut self) {
        self.density = (self.density + self.step).min(Self::MAX_DENSITY);
    }

    pub fn thin(&mut self) {
        self.density = (self.density - self.step).max(Self::MIN_DENSITY);
    }
}

/// State created once at startup and passed to every frame.
pub struct FrameContext {
    pub clock: Clock,
    pub fps: FpsCounter,
    pub sky: DayNightCycle,
    pub fog: Fog,
    pub shading: ShadingModel,
    pub blinn: bool,
    pub camera: CameraController,
    pub lighting: LightingSettings,
    quit_requested: bool,
}

impl FrameContext {
    pub fn new(config: &AppConfig) -> Result<Self, SkyError> {
        let mut camera = CameraController::new(CameraRig::default());
        camera.camera_mut().sensitivity = config.mouse_sensitivity;
        camera
            .camera_mut()
            .set_aspect(config.window_width, config.window_height);

        Ok(Self {
            clock: Clock::new(),
            fps: FpsCounter::new(0.0),
            sky: DayNightCycle::with_duration(config.day_length)?,
            fog: Fog::new(&config.fog),
            shading: ShadingModel::default(),
            blinn: false,
            camera,
            lighting: LightingSettings::default(),
            quit_requested: false,
        })
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Apply one command for the current frame.
    pub fn apply_command<M>(&mut self, command: Command, system: &mut SolarSystem<M>) {
        let dt = self.clock.delta_seconds();
        match command {
            Command::Quit => self.quit_requested = true,
            Command::MoveForward => self.move_camera(CameraMovement::Forward, dt),
            Command::MoveBackward => self.move_camera(CameraMovement::Backward, dt),
            Command::MoveLeft => self.move_camera(CameraMovement::Left, dt),
            Command::MoveRight => self.move_camera(CameraMovement::Right, dt),
            Command::FogDenser => self.fog.thicken(),
            Command::FogThinner => self.fog.thin(),
            Command::SpotlightLeft => turn(system, SpotlightTurn::Left),
            Command::SpotlightRight => turn(system, SpotlightTurn::Right),
            Command::SpotlightUp => turn(system, SpotlightTurn::Up),
            Command::SpotlightDown => turn(system, SpotlightTurn::Down),
            Command::SpotlightGrow => resize(system, SpotlightResize::Grow),
            Command::SpotlightShrink => resize(system, SpotlightResize::Shrink),
            Command::ToggleGouraud => {
                self.shading = self.shading.toggled();
                log::info!("Shading model: {:?}", self.shading);
            }
            Command::ToggleBlinn => {
                self.blinn = !self.blinn;
                log::info!("Blinn-Phong specular: {}", self.blinn);
            }
            Command::CycleCamera => {
                self.camera.toggle();
            }
        }
    }

    fn move_camera(&mut self, direction: CameraMovement, dt: f32) {
        self.camera.handle_movement(direction, dt);
    }

    /// Run one simulation step after the clock has advanced.
    ///
    /// `mouse` is the look delta with positive y meaning up.
    pub fn step<M>(&mut self, commands: &[Command], mouse: Vec2, scroll: f32, system: &mut SolarSystem<M>) {
        for &command in commands {
            self.apply_command(command, system);
        }
        if mouse != Vec2::ZERO {
            self.camera.handle_mouse(mouse.x, mouse.y);
        }
        if scroll != 0.0 {
            self.camera.handle_scroll(scroll);
        }

        let dt = self.clock.delta_seconds();
        system.update(dt, self.clock.elapsed_seconds());
        self.sky.update(dt);
        if let Some(ship) = system.spaceship() {
            self.camera.update(ship);
        }
    }

    /// Emit frame uniforms and lights, then draw every drawable.
    pub fn render<M, C>(&self, system: &SolarSystem<M>, ctx: &mut C)
    where
        C: ShadingContext<Mesh = M> + ?Sized,
    {
        let camera = self.camera.camera();
        ViewUniforms {
            projection: camera.projection_matrix(),
            view: camera.view_matrix(),
            view_position: camera.position,
            fog_density: self.fog.density(),
            sky_color: self.sky.color(),
            blinn: self.blinn,
        }
        .apply(ctx);

        if let Some(ship) = system.spaceship() {
            FrameLighting::collect(
                system.point_lights(),
                ship.spotlight().light(),
                &self.lighting,
                self.sky.color(),
            )
            .apply(ctx);
        }

        system.render(ctx);
    }
}

fn turn<M>(system: &mut SolarSystem<M>, direction: SpotlightTurn) {
    if let Some(ship) = system.spaceship_mut() {
        ship.turn_spotlight(direction);
    }
}

fn resize<M>(system: &mut SolarSystem<M>, direction: SpotlightResize) {
    if let Some(ship) = system.spaceship_mut() {
        ship.resize_spotlight(direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spaceship::tests::box_model;
    use glam::Vec3;
    use renderer::{CameraMode, CameraTarget, RecordedMesh, Recorder, Spotlight};

    fn setup() -> (FrameContext, SolarSystem<RecordedMesh>, Recorder) {
        let config = AppConfig::default();
        let mut rec = Recorder::new();
        let model = box_model(Vec3::new(-100.0, -50.0, 0.0), Vec3::new(100.0, 50.0, 400.0));
        let system = SolarSystem::new(&mut rec, &config.seeds, &model).unwrap();
        (FrameContext::new(&config).unwrap(), system, rec)
    }

    const CONTRACT: &[&str] = &[
        "model",
        "objectColor",
        "projection",
        "view",
        "fog_density",
        "skyColor",
        "viewPos",
        "blinn",
        "star",
    ];

    #[test]
    fn one_frame_sets_every_contract_uniform() {
        let (mut frame, mut system, mut rec) = setup();
        frame.clock.advance(1.0 / 60.0);
        frame.step(&[], Vec2::ZERO, 0.0, &mut system);
        rec.clear_frame();
        frame.render(&system, &mut rec);

        for name in CONTRACT {
            assert!(rec.has_uniform(name), "missing {name}");
        }
        for i in 0..2 {
            for field in ["position", "ambient", "diffuse", "specular", "constant", "linear", "quadratic"] {
                let name = format!("pointLights[{i}].{field}");
                assert!(rec.has_uniform(&name), "missing {name}");
            }
        }
        for field in [
            "position", "direction", "cutOff", "outerCutOff", "ambient", "diffuse", "specular", "constant",
            "linear", "quadratic",
        ] {
            assert!(rec.has_uniform(&format!("casterLight.{field}")), "missing casterLight.{field}");
        }
        for field in ["direction", "ambient", "diffuse", "specular"] {
            assert!(rec.has_uniform(&format!("directionalLight.{field}")), "missing directionalLight.{field}");
        }
        assert_eq!(rec.draws().len(), 2 + 66 + 256);
    }

    #[test]
    fn caster_cutoffs_are_cosines() {
        let (mut frame, mut system, mut rec) = setup();
        frame.clock.advance(0.1);
        frame.step(&[], Vec2::ZERO, 0.0, &mut system);
        frame.render(&system, &mut rec);
        let expected = Spotlight::DEFAULT_CUT_OFF.to_radians().cos();
        assert!((rec.float("casterLight.cutOff").unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn fog_commands_stay_in_range() {
        let (mut frame, mut system, _) = setup();
        for _ in 0..100 {
            frame.apply_command(Command::FogThinner, &mut system);
        }
        assert_eq!(frame.fog.density(), 0.0);
        frame.apply_command(Command::FogDenser, &mut system);
        assert!((frame.fog.density() - 0.001).abs() < 1e-6);
        let mut thick = Fog::new(&FogConfig { density: 0.9995, step: 0.001 });
        thick.thicken();
        assert_eq!(thick.density(), 1.0);
    }

    #[test]
    fn toggles_flip_shading_and_specular() {
        let (mut frame, mut system, mut rec) = setup();
        frame.apply_command(Command::ToggleGouraud, &mut system);
        frame.apply_command(Command::ToggleBlinn, &mut system);
        assert_eq!(frame.shading, ShadingModel::Gouraud);
        frame.render(&system, &mut rec);
        assert_eq!(rec.bool("blinn"), Some(true));
    }

    #[test]
    fn camera_cycle_and_mouse_gating() {
        let (mut frame, mut system, _) = setup();
        frame.clock.advance(0.5);
        let yaw = frame.camera.camera().yaw();
        frame.step(&[Command::CycleCamera], Vec2::new(30.0, 0.0), 0.0, &mut system);
        assert_eq!(frame.camera.mode(), CameraMode::Following);
        assert_eq!(frame.camera.camera().yaw(), yaw);

        let ship = system.spaceship().unwrap();
        let expected = (ship.focus_point() - frame.camera.camera().position).normalize();
        assert!((frame.camera.camera().forward() - expected).length() < 1e-4);

        frame.step(&[Command::CycleCamera], Vec2::ZERO, 0.0, &mut system);
        assert_eq!(frame.camera.mode(), CameraMode::MovingWith);
        assert_eq!(frame.camera.camera().position, system.spaceship().unwrap().mount_point());
    }

    #[test]
    fn movement_only_in_static_mode() {
        let (mut frame, mut system, _) = setup();
        frame.clock.advance(1.0);
        let start = frame.camera.camera().position;
        frame.step(&[Command::MoveForward], Vec2::ZERO, 0.0, &mut system);
        assert_ne!(frame.camera.camera().position, start);

        frame.step(&[Command::CycleCamera, Command::MoveForward], Vec2::ZERO, 0.0, &mut system);
        assert_eq!(frame.camera.camera().position, CameraRig::default().following_position);
    }

    #[test]
    fn spotlight_commands_reach_the_ship() {
        let (mut frame, mut system, _) = setup();
        for _ in 0..200 {
            frame.apply_command(Command::SpotlightGrow, &mut system);
        }
        frame.apply_command(Command::SpotlightLeft, &mut system);
        let spot = system.spaceship().unwrap().spotlight();
        assert_eq!(spot.light().cut_off, Spotlight::MAX_CUT_OFF);
        assert!((spot.yaw() + 90.1).abs() < 1e-4);
    }

    #[test]
    fn quit_is_latched() {
        let (mut frame, mut system, _) = setup();
        assert!(!frame.quit_requested());
        frame.apply_command(Command::Quit, &mut system);
        assert!(frame.quit_requested());
    }

    #[test]
    fn sky_clears_with_day_night_colour() {
        let (mut frame, mut system, mut rec) = setup();
        frame.clock.advance(0.25);
        frame.step(&[], Vec2::ZERO, 0.0, &mut system);
        frame.render(&system, &mut rec);
        assert_eq!(rec.vec3("skyColor"), Some(frame.sky.color()));
        assert_eq!(
            rec.vec3("directionalLight.ambient"),
            Some(frame.lighting.ambient_strength * frame.sky.color())
        );
    }
}
