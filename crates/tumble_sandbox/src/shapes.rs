//! Shape catalog
//!
//! Maps a shape request onto the unit render geometry plus the mesh scale
//! that sizes it, and onto the matching collision shape.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tumble_physics::ColliderShape;
use tumble_render::Geometry;

/// Sphere mesh tessellation
pub const SPHERE_GEOMETRY: Geometry = Geometry::Sphere {
    width_segments: 20,
    height_segments: 20,
};

/// Box mesh geometry
pub const BOX_GEOMETRY: Geometry = Geometry::Box;

/// Cylinder mesh tessellation
pub const CYLINDER_GEOMETRY: Geometry = Geometry::Cylinder { radial_segments: 32 };

/// Primitive families the sandbox can spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Sphere,
    Box,
    Cylinder,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Sphere, ShapeKind::Box, ShapeKind::Cylinder];
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sphere => write!(f, "sphere"),
            Self::Box => write!(f, "box"),
            Self::Cylinder => write!(f, "cylinder"),
        }
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sphere" | "ball" => Ok(Self::Sphere),
            "box" | "cube" => Ok(Self::Box),
            "cylinder" => Ok(Self::Cylinder),
            _ => Err(format!("Unknown shape: {}", s)),
        }
    }
}

/// A shape with concrete dimensions. Dimensions are not validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeSpec {
    Sphere { radius: f32 },
    Box { width: f32, height: f32, depth: f32 },
    Cylinder { radius: f32, height: f32 },
}

impl ShapeSpec {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Box { .. } => ShapeKind::Box,
            Self::Cylinder { .. } => ShapeKind::Cylinder,
        }
    }

    /// Draw random dimensions for `kind`.
    ///
    /// Sphere radius is `U·0.5`, box sides `U` each, cylinder radius
    /// `U·0.5 + 0.1` and height `U + 0.5`, with `U` uniform in (0, 1).
    pub fn random<R: Rng + ?Sized>(kind: ShapeKind, rng: &mut R) -> Self {
        match kind {
            ShapeKind::Sphere => Self::Sphere {
                radius: unit(rng) * 0.5,
            },
            ShapeKind::Box => Self::Box {
                width: unit(rng),
                height: unit(rng),
                depth: unit(rng),
            },
            ShapeKind::Cylinder => Self::Cylinder {
                radius: unit(rng) * 0.5 + 0.1,
                height: unit(rng) + 0.5,
            },
        }
    }
}

/// Uniform draw in (0, 1); a zero draw becomes the smallest positive step
fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let u: f32 = rng.gen();
    if u > 0.0 {
        u
    } else {
        f32::EPSILON
    }
}

/// Random spawn point: `x` and `z` uniform in `(-spread/2, spread/2)`, fixed `height`
pub fn random_spawn_position<R: Rng + ?Sized>(rng: &mut R, spread: f32, height: f32) -> [f32; 3] {
    let x = (rng.gen::<f32>() - 0.5) * spread;
    let z = (rng.gen::<f32>() - 0.5) * spread;
    [x, height, z]
}

/// Collision shape used for cylinders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CylinderCollider {
    /// Box with half-extents `(r, h/2, r)`
    #[default]
    Box,
    /// True cylinder
    Exact,
}

/// Render and collision representation of one shape
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeBuild {
    /// Unit geometry shared by every object of the kind
    pub geometry: Geometry,
    /// Mesh scale turning the unit geometry into the requested size
    pub scale: Vec3,
    /// Collision shape
    pub collider: ColliderShape,
}

/// Builds render and collision shapes from shape specs
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeCatalog {
    cylinder_collider: CylinderCollider,
}

impl ShapeCatalog {
    pub fn new(cylinder_collider: CylinderCollider) -> Self {
        Self { cylinder_collider }
    }

    /// Collision shape used for cylinders
    pub fn cylinder_collider(&self) -> CylinderCollider {
        self.cylinder_collider
    }

    pub fn build(&self, spec: &ShapeSpec) -> ShapeBuild {
        match *spec {
            ShapeSpec::Sphere { radius } => ShapeBuild {
                geometry: SPHERE_GEOMETRY,
                scale: Vec3::splat(radius),
                collider: ColliderShape::sphere(radius),
            },
            ShapeSpec::Box { width, height, depth } => ShapeBuild {
                geometry: BOX_GEOMETRY,
                scale: Vec3::new(width, height, depth),
                collider: ColliderShape::from_size(width, height, depth),
            },
            ShapeSpec::Cylinder { radius, height } => ShapeBuild {
                geometry: CYLINDER_GEOMETRY,
                scale: Vec3::new(radius, height, radius),
                collider: match self.cylinder_collider {
                    CylinderCollider::Box => ColliderShape::cuboid(radius, height * 0.5, radius),
                    CylinderCollider::Exact => ColliderShape::cylinder(height * 0.5, radius),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sphere_build() {
        let build = ShapeCatalog::default().build(&ShapeSpec::Sphere { radius: 0.5 });
        assert_eq!(build.geometry, SPHERE_GEOMETRY);
        assert_eq!(build.scale, Vec3::splat(0.5));
        assert_eq!(build.collider, ColliderShape::sphere(0.5));
    }

    #[test]
    fn test_box_build_halves_extents() {
        let build = ShapeCatalog::default().build(&ShapeSpec::Box {
            width: 1.0,
            height: 1.5,
            depth: 2.0,
        });
        assert_eq!(build.scale, Vec3::new(1.0, 1.5, 2.0));
        assert_eq!(build.collider, ColliderShape::cuboid(0.5, 0.75, 1.0));
    }

    #[test]
    fn test_cylinder_uses_box_by_default() {
        let spec = ShapeSpec::Cylinder {
            radius: 0.3,
            height: 1.2,
        };
        let build = ShapeCatalog::default().build(&spec);
        assert_eq!(build.geometry, CYLINDER_GEOMETRY);
        assert_eq!(build.scale, Vec3::new(0.3, 1.2, 0.3));
        assert_eq!(build.collider, ColliderShape::cuboid(0.3, 0.6, 0.3));

        let exact = ShapeCatalog::new(CylinderCollider::Exact).build(&spec);
        assert_eq!(exact.collider, ColliderShape::cylinder(0.6, 0.3));
    }

    #[test]
    fn test_random_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            match ShapeSpec::random(ShapeKind::Sphere, &mut rng) {
                ShapeSpec::Sphere { radius } => assert!(radius > 0.0 && radius < 0.5),
                other => panic!("unexpected {:?}", other),
            }
            match ShapeSpec::random(ShapeKind::Box, &mut rng) {
                ShapeSpec::Box { width, height, depth } => {
                    for side in [width, height, depth] {
                        assert!(side > 0.0 && side < 1.0);
                    }
                }
                other => panic!("unexpected {:?}", other),
            }
            match ShapeSpec::random(ShapeKind::Cylinder, &mut rng) {
                ShapeSpec::Cylinder { radius, height } => {
                    assert!((0.1..0.6).contains(&radius));
                    assert!((0.5..1.5).contains(&height));
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_spawn_position_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let [x, y, z] = random_spawn_position(&mut rng, 3.0, 3.0);
            assert!(x > -1.5 && x < 1.5);
            assert!(z > -1.5 && z < 1.5);
            assert_eq!(y, 3.0);
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Cube".parse::<ShapeKind>(), Ok(ShapeKind::Box));
        assert_eq!(ShapeKind::Cylinder.to_string(), "cylinder");
        assert!("torus".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_spec_from_toml() {
        let source = "kind = \"box\"\nwidth = 1.0\nheight = 1.5\ndepth = 2.0";
        let spec: ShapeSpec = toml::from_str(source).unwrap();
        assert_eq!(spec.kind(), ShapeKind::Box);
    }
}
