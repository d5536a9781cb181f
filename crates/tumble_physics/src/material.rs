//! Contact material shared by all colliders

use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Friction and restitution applied when two bodies touch.
///
/// The world holds exactly one of these and stamps it onto every collider,
/// so every body-body pair resolves with the same coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsMaterial {
    /// Friction coefficient (0 = frictionless)
    pub friction: f32,
    /// Restitution/bounciness (0 = no bounce, 1 = perfect bounce)
    pub restitution: f32,
    /// How friction is combined between two colliders
    pub friction_combine: CombineRule,
    /// How restitution is combined between two colliders
    pub restitution_combine: CombineRule,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.1,
            restitution: 0.7,
            friction_combine: CombineRule::Average,
            restitution_combine: CombineRule::Average,
        }
    }
}

/// Rule for combining material properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineRule {
    /// Use the average of both values
    #[default]
    Average,
    /// Use the minimum value
    Min,
    /// Use the maximum value
    Max,
    /// Multiply the values
    Multiply,
}

impl From<CombineRule> for rapier::CoefficientCombineRule {
    fn from(rule: CombineRule) -> Self {
        match rule {
            CombineRule::Average => rapier::CoefficientCombineRule::Average,
            CombineRule::Min => rapier::CoefficientCombineRule::Min,
            CombineRule::Max => rapier::CoefficientCombineRule::Max,
            CombineRule::Multiply => rapier::CoefficientCombineRule::Multiply,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material() {
        let material = PhysicsMaterial::default();
        assert_eq!(material.friction, 0.1);
        assert_eq!(material.restitution, 0.7);
        assert_eq!(material.restitution_combine, CombineRule::Average);
    }

    #[test]
    fn test_combine_rule_maps_to_rapier() {
        assert_eq!(
            rapier::CoefficientCombineRule::from(CombineRule::Min),
            rapier::CoefficientCombineRule::Min
        );
        assert_eq!(
            rapier::CoefficientCombineRule::from(CombineRule::Multiply),
            rapier::CoefficientCombineRule::Multiply
        );
    }
}
