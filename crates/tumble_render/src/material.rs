//! Physically based surface materials

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cube map used for reflections, one image per face.
///
/// Face order is +X, -X, +Y, -Y, +Z, -Z.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentMap {
    pub faces: [String; 6],
}

impl EnvironmentMap {
    /// Cube map whose faces are `px.png`, `nx.png`, ... under `dir`
    pub fn from_directory(dir: &str) -> Self {
        let dir = dir.trim_end_matches('/');
        let face = |name: &str| format!("{}/{}.png", dir, name);
        Self {
            faces: [face("px"), face("nx"), face("py"), face("ny"), face("pz"), face("nz")],
        }
    }
}

/// Metallic-roughness material
#[derive(Clone, Debug, PartialEq)]
pub struct StandardMaterial {
    /// Base color
    pub color: Color,
    /// Metalness (0 = dielectric, 1 = metal)
    pub metalness: f32,
    /// Roughness (0 = mirror, 1 = diffuse)
    pub roughness: f32,
    /// Shared reflection map
    pub env_map: Option<Arc<EnvironmentMap>>,
    /// Strength of the reflection map
    pub env_map_intensity: f32,
}

impl StandardMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Set metalness
    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    /// Set roughness
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Attach a reflection map with the given intensity
    pub fn with_env_map(mut self, env_map: Arc<EnvironmentMap>, intensity: f32) -> Self {
        self.env_map = Some(env_map);
        self.env_map_intensity = intensity;
        self
    }
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            metalness: 0.0,
            roughness: 1.0,
            env_map: None,
            env_map_intensity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_map_faces() {
        let map = EnvironmentMap::from_directory("textures/environmentMaps/0/");
        assert_eq!(map.faces[0], "textures/environmentMaps/0/px.png");
        assert_eq!(map.faces[5], "textures/environmentMaps/0/nz.png");
    }

    #[test]
    fn test_material_builders_clamp() {
        let material = StandardMaterial::new(Color::BLACK)
            .with_metalness(1.5)
            .with_roughness(-0.2);
        assert_eq!(material.metalness, 1.0);
        assert_eq!(material.roughness, 0.0);
        assert!(material.env_map.is_none());
    }

    #[test]
    fn test_env_map_is_shared() {
        let map = Arc::new(EnvironmentMap::from_directory("env"));
        let a = StandardMaterial::default().with_env_map(map.clone(), 0.5);
        let b = StandardMaterial::default().with_env_map(map.clone(), 0.5);
        assert!(Arc::ptr_eq(a.env_map.as_ref().unwrap(), b.env_map.as_ref().unwrap()));
        assert_eq!(Arc::strong_count(&map), 3);
    }
}
