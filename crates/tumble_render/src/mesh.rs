//! Geometry descriptors and meshes

use crate::material::StandardMaterial;
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Unit-sized primitive geometry; meshes size it through their scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Sphere of radius 1
    Sphere {
        width_segments: u32,
        height_segments: u32,
    },
    /// Box of size 1 on every axis
    Box,
    /// Cylinder of radius 1 and height 1 along Y
    Cylinder { radial_segments: u32 },
    /// Flat plane in local XY
    Plane { width: f32, height: f32 },
}

impl Geometry {
    /// Number of triangles the geometry tessellates into
    pub fn triangle_count(&self) -> u32 {
        match *self {
            Self::Sphere {
                width_segments,
                height_segments,
            } => width_segments * height_segments.saturating_sub(1) * 2,
            Self::Box => 12,
            // Side quads plus both caps.
            Self::Cylinder { radial_segments } => radial_segments * 4,
            Self::Plane { .. } => 2,
        }
    }
}

/// Translation, rotation and scale of a mesh
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Local-to-world matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A renderable object: geometry, material and placement
#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: StandardMaterial,
    pub transform: Transform,
    /// Whether the mesh casts shadows
    pub cast_shadow: bool,
    /// Whether the mesh receives shadows
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: StandardMaterial) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::IDENTITY,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Set the transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Enable shadow casting
    pub fn with_cast_shadow(mut self, cast: bool) -> Self {
        self.cast_shadow = cast;
        self
    }

    /// Enable shadow receiving
    pub fn with_receive_shadow(mut self, receive: bool) -> Self {
        self.receive_shadow = receive;
        self
    }

    /// Overwrite position and rotation, leaving scale alone
    pub fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.transform.position = position;
        self.transform.rotation = rotation;
    }
}
