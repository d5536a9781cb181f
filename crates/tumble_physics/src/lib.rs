//! Tumble Physics - rigid-body world for the sandbox
//!
//! A thin layer over Rapier 3D that gives the sandbox what it needs:
//!
//! - Dynamic and static rigid bodies, massed through their colliders
//! - Sphere, box, cylinder and plane colliders
//! - One contact material shared by every collider
//! - Sub-stepped fixed-timestep stepping
//! - Per-body collision subscriptions with impact speed
//!
//! # Example
//!
//! ```ignore
//! use tumble_physics::prelude::*;
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default());
//!
//! let body = physics.create_rigid_body(RigidBodyDesc::dynamic().with_position(0.0, 3.0, 0.0));
//! let ball = ColliderDesc::new(ColliderShape::sphere(0.5)).with_mass(1.0);
//! physics.create_collider(ball, Some(body));
//!
//! physics.subscribe(body, Box::new(|event: &CollisionEvent| {
//!     log::info!("impact at {:.2} m/s", event.impact_velocity);
//! }))?;
//!
//! physics.step(1.0 / 60.0, frame_delta, 3);
//! let pose = physics.get_body_pose(body)?;
//! ```

pub mod body;
pub mod collider;
pub mod config;
pub mod error;
pub mod events;
pub mod material;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{BodyPose, RigidBodyDesc, RigidBodyHandle, RigidBodyType};
    pub use crate::collider::{ColliderDesc, ColliderHandle, ColliderShape};
    pub use crate::config::{PhysicsConfig, STANDARD_GRAVITY};
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{
        CollisionEvent, CollisionEventType, ContactData, PhysicsEventHandler, SubscriptionId,
    };
    pub use crate::material::{CombineRule, PhysicsMaterial};
    pub use crate::world::PhysicsWorld;
}

pub use prelude::*;
