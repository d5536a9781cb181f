//! Error types for the physics world

use thiserror::Error;

/// Physics world errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Rigid body not found
    #[error("Rigid body not found: {0:?}")]
    BodyNotFound(crate::body::RigidBodyHandle),

    /// Collider not found
    #[error("Collider not found: {0:?}")]
    ColliderNotFound(crate::collider::ColliderHandle),

    /// Subscription not found
    #[error("Collision subscription not found: {0:?}")]
    SubscriptionNotFound(crate::events::SubscriptionId),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
