//! Day/night cycle driving the sky and ambient colour.

use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SkyError {
    #[error("day/night palette must contain at least one colour")]
    EmptyPalette,
    #[error("day/night cycle duration must be positive (got {0})")]
    InvalidDuration(f32),
}

/// Cyclic piecewise-linear interpolation over a colour palette.
///
/// The cycle is split into one stage per palette entry. During stage `i` the
/// colour moves linearly from `palette[i]` toward `palette[i + 1]`. At a stage
/// boundary the elapsed time restarts from zero and the colour snaps to the new
/// stage's palette entry, so errors never accumulate across stages. A single
/// update that spans more than one stage only advances one stage; that drift is
/// accepted.
#[derive(Debug, Clone)]
pub struct DayNightCycle {
    palette: Vec<Vec3>,
    stage_duration: f32,
    stage: usize,
    elapsed: f32,
    color: Vec3,
    step: Vec3,
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::build(Self::default_palette(), Self::DEFAULT_DURATION)
    }
}

impl DayNightCycle {
    /// Seconds for a full day.
    pub const DEFAULT_DURATION: f32 = 60.0;

    /// Long night, short day.
    pub fn default_palette() -> Vec<Vec3> {
        vec![Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ONE, Vec3::ONE]
    }

    pub fn new(palette: Vec<Vec3>, duration: f32) -> Result<Self, SkyError> {
        if palette.is_empty() {
            return Err(SkyError::EmptyPalette);
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SkyError::InvalidDuration(duration));
        }
        Ok(Self::build(palette, duration))
    }

    /// Default palette over a custom day length.
    pub fn with_duration(duration: f32) -> Result<Self, SkyError> {
        Self::new(Self::default_palette(), duration)
    }

    fn build(palette: Vec<Vec3>, duration: f32) -> Self {
        let stage_duration = duration / palette.len() as f32;
        let mut cycle = Self {
            palette,
            stage_duration,
            stage: 0,
            elapsed: 0.0,
            color: Vec3::ZERO,
            step: Vec3::ZERO,
        };
        cycle.enter_stage(0);
        cycle
    }

    fn enter_stage(&mut self, stage: usize) {
        let len = self.palette.len();
        self.stage = stage % len;
        self.color = self.palette[self.stage];
        let next = self.palette[(self.stage + 1) % len];
        self.step = (next - self.color) / self.stage_duration;
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.color += self.step * dt;
        self.elapsed += dt;

        if self.elapsed > self.stage_duration {
            self.elapsed = 0.0;
            self.enter_stage(self.stage + 1);
            log::trace!("Day/night stage {}", self.stage);
        }
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Colour velocity per second in the current stage.
    pub fn step(&self) -> Vec3 {
        self.step
    }

    pub fn elapsed_in_stage(&self) -> f32 {
        self.elapsed
    }

    pub fn stage_duration(&self) -> f32 {
        self.stage_duration
    }

    pub fn duration(&self) -> f32 {
        self.stage_duration * self.palette.len() as f32
    }
}
