//! Physics world - main simulation container

use crate::body::{BodyPose, RigidBodyDesc, RigidBodyHandle};
use crate::collider::{ColliderDesc, ColliderHandle};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{
    ChannelEventCollector, CollisionEvent, CollisionEventType, EventCollector,
    PhysicsEventHandler, Subscription, SubscriptionId,
};
use rapier3d::prelude as rapier;
use std::num::NonZeroUsize;

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    config: PhysicsConfig,

    /// Rapier physics pipeline
    pipeline: rapier::PhysicsPipeline,

    /// Gravity
    gravity: rapier::Vector<f32>,

    /// Integration parameters
    integration_params: rapier::IntegrationParameters,

    /// Island manager
    islands: rapier::IslandManager,

    /// Broad phase (sweep-and-prune)
    broad_phase: rapier::DefaultBroadPhase,

    /// Narrow phase
    narrow_phase: rapier::NarrowPhase,

    /// Impulse joint set
    impulse_joints: rapier::ImpulseJointSet,

    /// Multibody joint set
    multibody_joints: rapier::MultibodyJointSet,

    /// CCD solver
    ccd_solver: rapier::CCDSolver,

    /// Rigid body set
    bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    /// Events of the last `step` call
    events: EventCollector,

    /// Per-body collision handlers, in registration order
    subscriptions: Vec<Subscription>,

    /// Next subscription id
    next_subscription: u64,

    /// Total simulated time handed to `step`, in seconds
    time: f64,
}

impl PhysicsWorld {
    /// Create a new physics world
    pub fn new(config: PhysicsConfig) -> Self {
        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1], config.gravity[2]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        log::debug!(
            "Physics world created: gravity {:?}, timestep {:.4}s, {} substeps max",
            config.gravity,
            config.timestep,
            config.max_substeps
        );

        Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            events: EventCollector::new(),
            subscriptions: Vec::new(),
            next_subscription: 1,
            time: 0.0,
        }
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Get gravity
    pub fn gravity(&self) -> [f32; 3] {
        [self.gravity.x, self.gravity.y, self.gravity.z]
    }

    /// Total simulated time handed to `step`, in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    // ==================== Rigid Bodies ====================

    /// Create a rigid body
    pub fn create_rigid_body(&mut self, mut desc: RigidBodyDesc) -> RigidBodyHandle {
        desc.can_sleep &= self.config.sleeping_enabled;
        let handle = self.bodies.insert(desc.to_rapier_builder());
        RigidBodyHandle(handle)
    }

    /// Remove a rigid body together with its colliders and subscriptions
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) -> Result<()> {
        if !self.bodies.contains(handle.0) {
            return Err(PhysicsError::BodyNotFound(handle));
        }

        self.subscriptions.retain(|s| s.body != handle);
        self.bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true, // Remove attached colliders
        );
        Ok(())
    }

    /// Check whether a body is part of the simulation
    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Get rigid body position
    pub fn get_body_position(&self, handle: RigidBodyHandle) -> Result<[f32; 3]> {
        self.get_body_pose(handle).map(|pose| pose.position)
    }

    /// Get rigid body position and rotation
    pub fn get_body_pose(&self, handle: RigidBodyHandle) -> Result<BodyPose> {
        self.bodies
            .get(handle.0)
            .map(|b| {
                let pos = b.translation();
                let rot = b.rotation();
                BodyPose {
                    position: [pos.x, pos.y, pos.z],
                    rotation: [rot.i, rot.j, rot.k, rot.w],
                }
            })
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Get the mass of a rigid body
    pub fn get_body_mass(&self, handle: RigidBodyHandle) -> Result<f32> {
        self.bodies
            .get(handle.0)
            .map(|b| b.mass())
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    // ==================== Colliders ====================

    /// Create a collider, optionally attached to a rigid body.
    ///
    /// The world's contact material is applied. A collider with a mass
    /// gives its parent that mass and the inertia of its shape; the parent's
    /// mass properties are current as soon as this returns.
    pub fn create_collider(
        &mut self,
        desc: ColliderDesc,
        parent: Option<RigidBodyHandle>,
    ) -> ColliderHandle {
        let material = self.config.contact_material;
        let builder = desc
            .to_rapier_builder()
            .friction(material.friction)
            .restitution(material.restitution)
            .friction_combine_rule(material.friction_combine.into())
            .restitution_combine_rule(material.restitution_combine.into());

        let handle = match parent {
            Some(body) => {
                let handle = self.colliders.insert_with_parent(builder, body.0, &mut self.bodies);
                if let Some(b) = self.bodies.get_mut(body.0) {
                    if b.is_dynamic() {
                        b.recompute_mass_properties_from_colliders(&self.colliders);
                    }
                }
                handle
            }
            None => self.colliders.insert(builder),
        };
        ColliderHandle(handle)
    }

    /// Colliders attached to a body
    pub fn body_colliders(&self, handle: RigidBodyHandle) -> Result<Vec<ColliderHandle>> {
        self.bodies
            .get(handle.0)
            .map(|b| b.colliders().iter().copied().map(ColliderHandle).collect())
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// Body a collider is attached to, if any
    pub fn collider_parent(&self, handle: ColliderHandle) -> Result<Option<RigidBodyHandle>> {
        self.colliders
            .get(handle.0)
            .map(|c| c.parent().map(RigidBodyHandle))
            .ok_or(PhysicsError::ColliderNotFound(handle))
    }

    // ==================== Subscriptions ====================

    /// Register a handler for collision events involving `body`.
    ///
    /// Collision reporting is switched on for the body's colliders. The
    /// handler runs inside `step`, synchronously, once per event.
    pub fn subscribe(
        &mut self,
        body: RigidBodyHandle,
        handler: Box<dyn PhysicsEventHandler>,
    ) -> Result<SubscriptionId> {
        let collider_handles = self.body_colliders(body)?;
        for handle in collider_handles {
            if let Some(collider) = self.colliders.get_mut(handle.0) {
                collider.set_active_events(rapier::ActiveEvents::COLLISION_EVENTS);
            }
        }

        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(Subscription { id, body, handler });
        Ok(id)
    }

    /// Remove a handler and return it
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Result<Box<dyn PhysicsEventHandler>> {
        let index = self
            .subscriptions
            .iter()
            .position(|s| s.id == id)
            .ok_or(PhysicsError::SubscriptionNotFound(id))?;
        let subscription = self.subscriptions.remove(index);

        let still_listening = self.subscriptions.iter().any(|s| s.body == subscription.body);
        if !still_listening {
            if let Some(body) = self.bodies.get(subscription.body.0) {
                for handle in body.colliders() {
                    if let Some(collider) = self.colliders.get_mut(*handle) {
                        collider.set_active_events(rapier::ActiveEvents::empty());
                    }
                }
            }
        }

        Ok(subscription.handler)
    }

    /// Number of live subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    // ==================== Simulation ====================

    /// Advance the simulation by `actual_delta` seconds.
    ///
    /// Runs one internal step of `fixed_delta` for every fixed-step boundary
    /// crossed by the accumulated time, at most `max_substeps` of them; time
    /// beyond the cap is dropped. A zero delta runs exactly one fixed step.
    /// Returns the number of internal steps taken.
    pub fn step(&mut self, fixed_delta: f32, actual_delta: f32, max_substeps: u32) -> u32 {
        self.events.clear();
        self.integration_params.dt = fixed_delta;

        if actual_delta <= 0.0 {
            self.step_internal();
            self.time += f64::from(fixed_delta);
            return 1;
        }

        let dt = f64::from(fixed_delta);
        let before = (self.time / dt).floor();
        let after = ((self.time + f64::from(actual_delta)) / dt).floor();
        let steps = ((after - before).max(0.0) as u32).min(max_substeps);

        for _ in 0..steps {
            self.step_internal();
        }
        self.time += f64::from(actual_delta);

        log::trace!("Physics step: delta {:.4}s, {} substeps", actual_delta, steps);
        steps
    }

    /// Internal fixed timestep
    fn step_internal(&mut self) {
        let (collision_send, collision_recv) = crossbeam_channel::unbounded();
        let event_handler = ChannelEventCollector {
            collisions: collision_send,
        };

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        let first_new = self.events.collision_events.len();
        while let Ok(raw) = collision_recv.try_recv() {
            let body_of = |h: rapier::ColliderHandle| {
                self.colliders
                    .get(h)
                    .and_then(|c| c.parent())
                    .map(RigidBodyHandle)
            };

            self.events.collision_events.push(CollisionEvent {
                collider1: ColliderHandle(raw.collider1),
                collider2: ColliderHandle(raw.collider2),
                body1: body_of(raw.collider1),
                body2: body_of(raw.collider2),
                event_type: if raw.started {
                    CollisionEventType::Started
                } else {
                    CollisionEventType::Stopped
                },
                contacts: raw.contacts,
                impact_velocity: raw.impact_velocity,
            });
        }

        // Dispatch in discovery order: body 1's listeners, then body 2's.
        for event in &self.events.collision_events[first_new..] {
            for body in [event.body1, event.body2].into_iter().flatten() {
                for subscription in self.subscriptions.iter_mut().filter(|s| s.body == body) {
                    subscription.handler.on_collision(event);
                }
            }
        }
    }

    // ==================== Events ====================

    /// Get collision events from the last step
    pub fn collision_events(&self) -> &[CollisionEvent] {
        &self.events.collision_events
    }

    // ==================== Debug ====================

    /// Get number of rigid bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get number of dynamic bodies
    pub fn dynamic_body_count(&self) -> usize {
        self.bodies.iter().filter(|(_, b)| b.is_dynamic()).count()
    }

    /// Get number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Get number of active (awake) bodies
    pub fn active_body_count(&self) -> usize {
        self.islands.active_dynamic_bodies().len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
