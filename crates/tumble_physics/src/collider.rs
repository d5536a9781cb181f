//! Collider shapes and descriptors

use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) rapier::ColliderHandle);

impl ColliderHandle {
    /// Create from raw Rapier handle
    pub fn from_raw(handle: rapier::ColliderHandle) -> Self {
        Self(handle)
    }
}

/// Collision shape type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Sphere with radius
    Sphere { radius: f32 },
    /// Box with half-extents
    Box { half_extents: [f32; 3] },
    /// Cylinder aligned along Y axis
    CylinderY { half_height: f32, radius: f32 },
    /// Infinite plane whose solid side lies below local +Z
    Plane,
}

impl ColliderShape {
    /// Create a sphere shape
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Box {
            half_extents: [hx, hy, hz],
        }
    }

    /// Create a box shape from full size
    pub fn from_size(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            half_extents: [width * 0.5, height * 0.5, depth * 0.5],
        }
    }

    /// Create a cylinder shape (Y-aligned)
    pub fn cylinder(half_height: f32, radius: f32) -> Self {
        Self::CylinderY { half_height, radius }
    }

    /// Build a Rapier shared shape
    pub(crate) fn to_rapier(&self) -> rapier::SharedShape {
        match self {
            Self::Sphere { radius } => rapier::SharedShape::ball(*radius),
            Self::Box { half_extents } => {
                rapier::SharedShape::cuboid(half_extents[0], half_extents[1], half_extents[2])
            }
            Self::CylinderY { half_height, radius } => {
                rapier::SharedShape::cylinder(*half_height, *radius)
            }
            Self::Plane => rapier::SharedShape::halfspace(rapier::Vector::z_axis()),
        }
    }
}

/// Description for creating a collider.
///
/// Friction and restitution are not part of the description: the world
/// applies its shared contact material to every collider it creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColliderDesc {
    /// Collision shape
    pub shape: ColliderShape,
    /// Mass given to the parent body; inertia follows from the shape.
    /// `None` makes the collider massless.
    pub mass: Option<f32>,
}

impl ColliderDesc {
    /// Create a new collider description with a shape
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            mass: None,
        }
    }

    /// Set the mass this collider contributes
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Build a Rapier collider builder.
    ///
    /// Collision events stay off until the world subscribes a handler.
    pub(crate) fn to_rapier_builder(&self) -> rapier::ColliderBuilder {
        let builder = rapier::ColliderBuilder::new(self.shape.to_rapier());
        match self.mass {
            Some(mass) => builder.mass(mass),
            None => builder.density(0.0),
        }
    }
}
