//! Application configuration (window, input, scene). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Degrees of yaw/pitch per mouse count.
    #[serde(default = "default_sensitivity")]
    pub mouse_sensitivity: f32,
    /// glTF model for the spaceship.
    #[serde(default = "default_ship_model")]
    pub ship_model: PathBuf,
    /// Seconds for one full day/night cycle.
    #[serde(default = "default_day_length")]
    pub day_length: f32,
    #[serde(default)]
    pub fog: FogConfig,
    #[serde(default)]
    pub seeds: SeedConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FogConfig {
    #[serde(default = "default_fog_density")]
    pub density: f32,
    /// Density change per frame while a fog key is held.
    #[serde(default = "default_fog_step")]
    pub step: f32,
}

/// Seeds for the three generated fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_body_seed")]
    pub planets: u64,
    #[serde(default = "default_body_seed")]
    pub stars: u64,
    #[serde(default = "default_asteroid_seed")]
    pub asteroids: u64,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_sensitivity() -> f32 {
    0.1
}
fn default_ship_model() -> PathBuf {
    PathBuf::from("models/rocket/rocket.gltf")
}
fn default_day_length() -> f32 {
    60.0
}
fn default_fog_density() -> f32 {
    0.05
}
fn default_fog_step() -> f32 {
    0.001
}
fn default_body_seed() -> u64 {
    1
}
fn default_asteroid_seed() -> u64 {
    123
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            density: default_fog_density(),
            step: default_fog_step(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            planets: default_body_seed(),
            stars: default_body_seed(),
            asteroids: default_asteroid_seed(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            mouse_sensitivity: default_sensitivity(),
            ship_model: default_ship_model(),
            day_length: default_day_length(),
            fog: FogConfig::default(),
            seeds: SeedConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => match Self::parse(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => log::info!("No config at {:?}, using defaults", path),
        }
        Self::default()
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = AppConfig::parse("(vsync: false, seeds: (asteroids: 7))").unwrap();
        assert!(!config.vsync);
        assert_eq!(config.seeds.asteroids, 7);
        assert_eq!(config.seeds.planets, 1);
        assert_eq!(config.fog, FogConfig::default());
        assert_eq!(config.day_length, 60.0);
    }

    #[test]
    fn empty_struct_is_default() {
        assert_eq!(AppConfig::parse("()").unwrap(), AppConfig::default());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(AppConfig::parse("(window_width: \"wide\")").is_err());
    }
}
