//! Physics configuration

use crate::material::PhysicsMaterial;
use serde::{Deserialize, Serialize};

/// Standard gravity used by the sandbox (m/s², pointing down Y)
pub const STANDARD_GRAVITY: f32 = -9.82;

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.82 in Y)
    pub gravity: [f32; 3],

    /// Fixed reference timestep for one internal solver step
    pub timestep: f32,

    /// Maximum number of internal steps per `step` call
    pub max_substeps: u32,

    /// Solver iterations per internal step
    pub solver_iterations: usize,

    /// Let resting bodies fall asleep
    pub sleeping_enabled: bool,

    /// Contact material shared by every collider in the world
    pub contact_material: PhysicsMaterial,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, STANDARD_GRAVITY, 0.0],
            timestep: 1.0 / 60.0,
            max_substeps: 3,
            solver_iterations: 4,
            sleeping_enabled: true,
            contact_material: PhysicsMaterial::default(),
        }
    }
}
