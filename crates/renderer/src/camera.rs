//! Fly camera and the three-mode camera controller.

use glam::{Mat4, Vec3};

/// Keyboard translation directions for the free-fly camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Perspective camera driven by yaw/pitch in degrees.
///
/// Yaw -90 with pitch 0 looks down -Z. The forward vector is normally derived
/// from yaw/pitch; [`Camera::look_towards`] overrides it without touching them.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    /// Yaw in degrees.
    yaw: f32,
    /// Pitch in degrees.
    pitch: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    /// Units per second.
    pub movement_speed: f32,
    /// Degrees per mouse count.
    pub sensitivity: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            front: -Vec3::Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            zoom: Self::MAX_ZOOM,
            movement_speed: 2.5,
            sensitivity: 0.1,
            near: 0.1,
            far: 100.0,
            aspect: 16.0 / 9.0,
        };
        camera.update_vectors();
        camera
    }
}

impl Camera {
    pub const MAX_PITCH: f32 = 89.0;
    pub const MIN_ZOOM: f32 = 1.0;
    pub const MAX_ZOOM: f32 = 45.0;

    /// Create a new camera at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Jump to a position and orientation.
    pub fn set_pose(&mut self, position: Vec3, yaw: f32, pitch: f32) {
        self.position = position;
        self.yaw = yaw;
        self.pitch = pitch.clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
        self.update_vectors();
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Apply a mouse delta. Positive `dy` looks up.
    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
        self.update_vectors();
    }

    /// Scroll narrows (positive) or widens the field of view.
    pub fn process_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }

    /// Point the camera at `target` without changing yaw/pitch.
    pub fn look_towards(&mut self, target: Vec3) {
        let to_target = target - self.position;
        if to_target.length_squared() < 1e-12 {
            return;
        }
        self.front = to_target.normalize();
        let right = self.front.cross(self.world_up);
        if right.length_squared() > 1e-12 {
            self.right = right.normalize();
        }
        self.up = self.right.cross(self.front).normalize();
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn forward(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

/// Which strategy derives the camera pose each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Free-fly from keyboard and mouse.
    #[default]
    Static,
    /// Fixed anchor, always facing the target.
    Following,
    /// Riding on the target's mount point with a fixed orientation.
    MovingWith,
}

impl CameraMode {
    pub fn next(self) -> Self {
        match self {
            CameraMode::Static => CameraMode::Following,
            CameraMode::Following => CameraMode::MovingWith,
            CameraMode::MovingWith => CameraMode::Static,
        }
    }
}

/// Something the camera can follow or ride on.
pub trait CameraTarget {
    /// Point a following camera looks at.
    fn focus_point(&self) -> Vec3;
    /// Where a riding camera sits.
    fn mount_point(&self) -> Vec3;
}

/// Fixed poses applied on mode transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub start_position: Vec3,
    pub following_position: Vec3,
    pub static_yaw: f32,
    pub static_pitch: f32,
    pub mounted_yaw: f32,
    pub mounted_pitch: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(-5.74, -0.4, 5.56),
            following_position: Vec3::new(-17.8, -1.2, 0.74),
            static_yaw: 70.3,
            static_pitch: 1.5,
            mounted_yaw: 89.4,
            mounted_pitch: 6.2,
        }
    }
}

/// Camera state machine: `Static -> Following -> MovingWith -> Static`.
///
/// Transitions set the pose from the rig directly; nothing is interpolated.
/// Mouse look and keyboard movement only apply in `Static`.
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: Camera,
    mode: CameraMode,
    rig: CameraRig,
}

impl CameraController {
    pub fn new(rig: CameraRig) -> Self {
        Self::with_camera(Camera::default(), rig)
    }

    /// Use a preconfigured camera (speed, sensitivity, aspect).
    pub fn with_camera(mut camera: Camera, rig: CameraRig) -> Self {
        camera.set_pose(rig.start_position, rig.static_yaw, rig.static_pitch);
        Self {
            camera,
            mode: CameraMode::Static,
            rig,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Advance to the next mode and apply its entry pose.
    pub fn toggle(&mut self) -> CameraMode {
        self.mode = self.mode.next();
        let rig = self.rig;
        match self.mode {
            CameraMode::Following => self.camera.position = rig.following_position,
            CameraMode::MovingWith => {
                self.camera.set_pose(rig.start_position, rig.mounted_yaw, rig.mounted_pitch)
            }
            CameraMode::Static => {
                self.camera.set_pose(rig.start_position, rig.static_yaw, rig.static_pitch)
            }
        }
        log::info!("Camera mode: {:?}", self.mode);
        self.mode
    }

    /// Mouse look. Returns whether the delta was applied.
    pub fn handle_mouse(&mut self, dx: f32, dy: f32) -> bool {
        if self.mode != CameraMode::Static {
            return false;
        }
        self.camera.process_mouse(dx, dy);
        true
    }

    /// Keyboard translation. Returns whether the move was applied.
    pub fn handle_movement(&mut self, direction: CameraMovement, dt: f32) -> bool {
        if self.mode != CameraMode::Static {
            return false;
        }
        self.camera.process_keyboard(direction, dt);
        true
    }

    /// Zoom works in every mode.
    pub fn handle_scroll(&mut self, dy: f32) {
        self.camera.process_scroll(dy);
    }

    /// Recompute the pose from the target for the current mode.
    pub fn update<T: CameraTarget + ?Sized>(&mut self, target: &T) {
        match self.mode {
            CameraMode::Static => {}
            CameraMode::Following => self.camera.look_towards(target.focus_point()),
            CameraMode::MovingWith => self.camera.position = target.mount_point(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Beacon {
        position: Vec3,
    }

    impl CameraTarget for Beacon {
        fn focus_point(&self) -> Vec3 {
            self.position
        }

        fn mount_point(&self) -> Vec3 {
            self.position + Vec3::Y
        }
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert!(approx(camera.forward(), -Vec3::Z));
        assert!(approx(camera.right(), Vec3::X));
        assert!(approx(camera.up(), Vec3::Y));
    }

    #[test]
    fn pitch_is_constrained() {
        let mut camera = Camera::default();
        camera.process_mouse(0.0, 10_000.0);
        assert_eq!(camera.pitch(), Camera::MAX_PITCH);
        camera.process_mouse(0.0, -100_000.0);
        assert_eq!(camera.pitch(), -Camera::MAX_PITCH);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.process_scroll(100.0);
        assert_eq!(camera.zoom, Camera::MIN_ZOOM);
        camera.process_scroll(-100.0);
        assert_eq!(camera.zoom, Camera::MAX_ZOOM);
    }

    #[test]
    fn keyboard_moves_along_front() {
        let mut camera = Camera::default();
        camera.process_keyboard(CameraMovement::Forward, 2.0);
        assert!(approx(camera.position, Vec3::new(0.0, 0.0, -5.0)));
        camera.process_keyboard(CameraMovement::Right, 2.0);
        assert!(approx(camera.position, Vec3::new(5.0, 0.0, -5.0)));
    }

    #[test]
    fn starts_static_at_rig_start() {
        let rig = CameraRig::default();
        let controller = CameraController::new(rig);
        assert_eq!(controller.mode(), CameraMode::Static);
        assert_eq!(controller.camera().position, rig.start_position);
        assert_eq!(controller.camera().yaw(), rig.static_yaw);
        assert_eq!(controller.camera().pitch(), rig.static_pitch);
    }

    #[test]
    fn three_toggles_return_to_start() {
        let mut controller = CameraController::new(CameraRig::default());
        let before = (controller.mode(), controller.camera().position, controller.camera().yaw());
        assert_eq!(controller.toggle(), CameraMode::Following);
        assert_eq!(controller.toggle(), CameraMode::MovingWith);
        assert_eq!(controller.toggle(), CameraMode::Static);
        let after = (controller.mode(), controller.camera().position, controller.camera().yaw());
        assert_eq!(before, after);
    }

    #[test]
    fn mouse_ignored_outside_static() {
        let mut controller = CameraController::new(CameraRig::default());
        assert!(controller.handle_mouse(5.0, 5.0));

        for _ in 0..2 {
            controller.toggle();
            let (yaw, pitch) = (controller.camera().yaw(), controller.camera().pitch());
            assert!(!controller.handle_mouse(40.0, -25.0));
            assert_eq!(controller.camera().yaw(), yaw);
            assert_eq!(controller.camera().pitch(), pitch);
        }
    }

    #[test]
    fn following_faces_target_from_anchor() {
        let rig = CameraRig::default();
        let mut controller = CameraController::new(rig);
        controller.toggle();
        let target = Beacon { position: Vec3::new(3.0, 4.0, 10.0) };
        controller.update(&target);
        let camera = controller.camera();
        assert_eq!(camera.position, rig.following_position);
        assert!(approx(camera.forward(), (target.position - rig.following_position).normalize()));
        assert!(!controller.handle_movement(CameraMovement::Forward, 1.0));
    }

    #[test]
    fn moving_with_rides_mount_point_with_fixed_orientation() {
        let rig = CameraRig::default();
        let mut controller = CameraController::new(rig);
        controller.toggle();
        controller.toggle();
        assert_eq!(controller.mode(), CameraMode::MovingWith);

        let mut target = Beacon { position: Vec3::new(1.0, 2.0, 3.0) };
        for z in [3.0, 8.0, 20.0] {
            target.position.z = z;
            controller.update(&target);
            assert_eq!(controller.camera().position, target.mount_point());
            assert_eq!(controller.camera().yaw(), rig.mounted_yaw);
            assert_eq!(controller.camera().pitch(), rig.mounted_pitch);
        }
    }

    #[test]
    fn static_mode_ignores_target() {
        let mut controller = CameraController::new(CameraRig::default());
        let before = controller.camera().position;
        controller.update(&Beacon { position: Vec3::splat(50.0) });
        assert_eq!(controller.camera().position, before);
    }
}
