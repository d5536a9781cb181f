//! Appearance factory: materials for spawned objects and the floor

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tumble_render::{Color, EnvironmentMap, StandardMaterial};

/// Palette spawned objects draw their color from
pub const PALETTE: [[u8; 3]; 7] = [
    [0xE6, 0x39, 0x46], // red
    [0x45, 0x7B, 0x9D], // blue
    [0x1D, 0x35, 0x57], // dark blue
    [0xF1, 0xFA, 0xEE], // off-white
    [0xA8, 0xDA, 0xDC], // light blue
    [0xFF, 0xB7, 0x03], // yellow
    [0xFB, 0x85, 0x00], // orange
];

/// Floor color
pub const FLOOR_COLOR: [u8; 3] = [0x77, 0x77, 0x77];

pub const METALNESS: f32 = 0.3;
pub const ROUGHNESS: f32 = 0.4;
pub const ENV_MAP_INTENSITY: f32 = 0.5;

/// Produces materials sharing one environment map
pub struct AppearanceFactory {
    env_map: Arc<EnvironmentMap>,
    palette: Vec<Color>,
    rng: ChaCha8Rng,
}

impl AppearanceFactory {
    pub fn new(env_map: EnvironmentMap, rng: ChaCha8Rng) -> Self {
        Self {
            env_map: Arc::new(env_map),
            palette: PALETTE.iter().map(|&[r, g, b]| Color::from_rgb8(r, g, b)).collect(),
            rng,
        }
    }

    /// The shared environment map
    pub fn env_map(&self) -> &Arc<EnvironmentMap> {
        &self.env_map
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Material with a palette color picked uniformly at random
    pub fn random_material(&mut self) -> StandardMaterial {
        let color = self.palette[self.rng.gen_range(0..self.palette.len())];
        self.material(color)
    }

    /// Material for the floor
    pub fn floor_material(&self) -> StandardMaterial {
        let [r, g, b] = FLOOR_COLOR;
        self.material(Color::from_rgb8(r, g, b))
    }

    fn material(&self, color: Color) -> StandardMaterial {
        StandardMaterial::new(color)
            .with_metalness(METALNESS)
            .with_roughness(ROUGHNESS)
            .with_env_map(self.env_map.clone(), ENV_MAP_INTENSITY)
    }
}
