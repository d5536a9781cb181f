//! Sandbox configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `TUMBLE_SOUND`, `TUMBLE_SEED`, `TUMBLE_FRAMES`,
//!    `TUMBLE_FPS`
//! 2. Config file: `$TUMBLE_CONFIG`, else `tumble.toml`, else
//!    `config/tumble.toml`
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! seed = 42
//! cylinder_collider = "box"   # box, exact
//!
//! [physics]
//! gravity = [0.0, -9.82, 0.0]
//! max_substeps = 3
//!
//! [physics.contact_material]
//! friction = 0.1
//! restitution = 0.7
//!
//! [sound]
//! enabled = true
//! clip = "assets/sounds/hit.mp3"
//!
//! [display]
//! target_fps = 60
//! max_frames = 600
//!
//! [[initial_objects]]
//! position = [0.0, 3.0, 0.0]
//! shape = { kind = "sphere", radius = 0.5 }
//! ```

use crate::error::{Result, SandboxError};
use crate::hit_sound::DEFAULT_IMPACT_THRESHOLD;
use crate::shapes::{CylinderCollider, ShapeSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tumble_physics::PhysicsConfig;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "TUMBLE_CONFIG";

/// Config files tried when `TUMBLE_CONFIG` is unset
pub const CONFIG_PATHS: [&str; 2] = ["tumble.toml", "config/tumble.toml"];

/// Where spawned objects appear
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Drop height
    pub height: f32,
    /// Width of the square (centered on the origin) spawns land in
    pub spread: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            height: 3.0,
            spread: 3.0,
        }
    }
}

/// Collision sound settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Start with sound on
    pub enabled: bool,
    /// Impact speed (m/s) a collision must exceed to be heard
    pub threshold: f32,
    /// Audio file played on impact
    pub clip: PathBuf,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: DEFAULT_IMPACT_THRESHOLD,
            clip: PathBuf::from("assets/sounds/hit.mp3"),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Surface width in logical pixels
    pub width: u32,
    /// Surface height in logical pixels
    pub height: u32,
    /// Pixel density reported by the display
    pub device_pixel_ratio: f32,
    /// Frame pacing target; 0 runs unpaced
    pub target_fps: u32,
    /// Stop after this many frames
    pub max_frames: Option<u64>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_pixel_ratio: 1.0,
            target_fps: 60,
            max_frames: None,
        }
    }
}

/// Camera and orbit controls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view (degrees)
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Initial position; the camera looks at the origin
    pub position: [f32; 3],
    /// Orbit damping factor; 0 disables damping
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 100.0,
            position: [-3.0, 3.0, 3.0],
            damping: 0.05,
        }
    }
}

/// Render environment assets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Directory holding the cube map faces (`px.png`, `nx.png`, ...)
    pub env_map_dir: String,
    /// Side length of the visible floor
    pub floor_size: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            env_map_dir: "textures/environmentMaps/0".to_string(),
            floor_size: 500.0,
        }
    }
}

/// An object placed when the session starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialObject {
    pub shape: ShapeSpec,
    pub position: [f32; 3],
}

/// Complete sandbox configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub physics: PhysicsConfig,
    pub spawn: SpawnConfig,
    pub sound: SoundConfig,
    pub display: DisplayConfig,
    pub camera: CameraConfig,
    pub environment: EnvironmentConfig,
    /// Collision shape used for cylinders
    pub cylinder_collider: CylinderCollider,
    /// Objects spawned at startup
    pub initial_objects: Vec<InitialObject>,
    /// Seed for every random draw; random when unset
    pub seed: Option<u64>,
    /// File the config was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            spawn: SpawnConfig::default(),
            sound: SoundConfig::default(),
            display: DisplayConfig::default(),
            camera: CameraConfig::default(),
            environment: EnvironmentConfig::default(),
            cylinder_collider: CylinderCollider::Box,
            initial_objects: vec![
                InitialObject {
                    shape: ShapeSpec::Sphere { radius: 0.5 },
                    position: [0.0, 3.0, 0.0],
                },
                InitialObject {
                    shape: ShapeSpec::Box {
                        width: 1.0,
                        height: 1.5,
                        depth: 2.0,
                    },
                    position: [0.0, 3.0, 0.0],
                },
            ],
            seed: None,
            config_path: None,
        }
    }
}

impl SandboxConfig {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                let config = Self::load_from_file(&path)?;
                log::info!("Loaded config from {}", path.display());
                config
            }
            None => {
                log::info!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// First config file to use, if any
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                // An explicit path is used even if missing, so the error surfaces.
                return Some(PathBuf::from(path));
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SandboxError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml(&content).map_err(|source| SandboxError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `TUMBLE_*` overrides; `lookup` returns a variable's value
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("TUMBLE_SOUND") {
            match parse_switch(&value) {
                Some(enabled) => {
                    self.sound.enabled = enabled;
                    log::info!("Sound from env: {}", if enabled { "on" } else { "off" });
                }
                None => log::warn!("Ignoring TUMBLE_SOUND={}", value),
            }
        }

        if let Some(value) = lookup("TUMBLE_SEED") {
            match value.trim().parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => log::warn!("Ignoring TUMBLE_SEED={}", value),
            }
        }

        if let Some(value) = lookup("TUMBLE_FRAMES") {
            match value.trim().parse() {
                Ok(frames) => self.display.max_frames = Some(frames),
                Err(_) => log::warn!("Ignoring TUMBLE_FRAMES={}", value),
            }
        }

        if let Some(value) = lookup("TUMBLE_FPS") {
            match value.trim().parse() {
                Ok(fps) => self.display.target_fps = fps,
                Err(_) => log::warn!("Ignoring TUMBLE_FPS={}", value),
            }
        }
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_original_scene() {
        let config = SandboxConfig::default();
        assert_eq!(config.physics.gravity, [0.0, -9.82, 0.0]);
        assert_eq!(config.physics.max_substeps, 3);
        assert_eq!(config.camera.position, [-3.0, 3.0, 3.0]);
        assert_eq!(config.cylinder_collider, CylinderCollider::Box);
        assert_eq!(config.initial_objects.len(), 2);
        assert!(!config.sound.enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SandboxConfig::from_toml(
            r#"
            seed = 42
            cylinder_collider = "exact"

            [physics.contact_material]
            restitution = 0.2

            [display]
            max_frames = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.cylinder_collider, CylinderCollider::Exact);
        assert_eq!(config.physics.contact_material.restitution, 0.2);
        assert_eq!(config.physics.contact_material.friction, 0.1);
        assert_eq!(config.display.max_frames, Some(10));
        assert_eq!(config.display.target_fps, 60);
        assert_eq!(config.initial_objects.len(), 2);
    }

    #[test]
    fn test_initial_objects_from_toml() {
        let config = SandboxConfig::from_toml(
            r#"
            [[initial_objects]]
            position = [1.0, 4.0, 0.0]
            shape = { kind = "cylinder", radius = 0.3, height = 1.0 }
            "#,
        )
        .unwrap();

        assert_eq!(
            config.initial_objects,
            vec![InitialObject {
                shape: ShapeSpec::Cylinder {
                    radius: 0.3,
                    height: 1.0
                },
                position: [1.0, 4.0, 0.0],
            }]
        );
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TUMBLE_SOUND", "on"),
            ("TUMBLE_SEED", "7"),
            ("TUMBLE_FRAMES", "120"),
            ("TUMBLE_FPS", "bogus"),
        ]
        .into_iter()
        .collect();

        let mut config = SandboxConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert!(config.sound.enabled);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.display.max_frames, Some(120));
        assert_eq!(config.display.target_fps, 60);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = SandboxConfig::load_from_file(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, SandboxError::ConfigIo { .. }));
        assert!(err.to_string().contains("does/not/exist.toml"));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        assert!(SandboxConfig::from_toml("seed = \"forty-two\"").is_err());
    }
}
