//! Collision events and per-body subscriptions

use crate::body::RigidBodyHandle;
use crate::collider::ColliderHandle;
use rapier3d::prelude as rapier;

/// Contact data from a collision
#[derive(Debug, Clone, Copy)]
pub struct ContactData {
    /// Contact point on collider 1, in world space
    pub point: [f32; 3],
    /// Contact normal in world space (pointing from collider1 to collider2)
    pub normal: [f32; 3],
    /// Signed separation (negative while penetrating)
    pub depth: f32,
}

/// Type of collision event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEventType {
    /// Collision started
    Started,
    /// Collision ended
    Stopped,
}

/// A collision event between two colliders
#[derive(Debug, Clone)]
pub struct CollisionEvent {
    /// First collider
    pub collider1: ColliderHandle,
    /// Second collider
    pub collider2: ColliderHandle,
    /// Body owning collider 1 (None once the body has been removed)
    pub body1: Option<RigidBodyHandle>,
    /// Body owning collider 2 (None once the body has been removed)
    pub body2: Option<RigidBodyHandle>,
    /// Event type
    pub event_type: CollisionEventType,
    /// Contact points (empty for stopped events)
    pub contacts: Vec<ContactData>,
    /// Approach speed along the contact normal at the moment of impact.
    ///
    /// Measured from the velocities the bodies had before the solver
    /// resolved the contact. Zero for stopped events.
    pub impact_velocity: f32,
}

impl CollisionEvent {
    /// Check if this is a start event
    pub fn is_started(&self) -> bool {
        self.event_type == CollisionEventType::Started
    }

    /// Check if this is a stop event
    pub fn is_stopped(&self) -> bool {
        self.event_type == CollisionEventType::Stopped
    }

    /// Check whether `body` takes part in this event
    pub fn involves(&self, body: RigidBodyHandle) -> bool {
        self.body1 == Some(body) || self.body2 == Some(body)
    }

    /// Get the average contact point
    pub fn average_contact_point(&self) -> Option<[f32; 3]> {
        if self.contacts.is_empty() {
            return None;
        }
        let mut sum = [0.0f32; 3];
        for contact in &self.contacts {
            sum[0] += contact.point[0];
            sum[1] += contact.point[1];
            sum[2] += contact.point[2];
        }
        let n = self.contacts.len() as f32;
        Some([sum[0] / n, sum[1] / n, sum[2] / n])
    }
}

/// Handler trait for collision events delivered to a subscribed body
pub trait PhysicsEventHandler: Send {
    /// Called for every collision start or stop involving the body
    fn on_collision(&mut self, event: &CollisionEvent);
}

impl<F> PhysicsEventHandler for F
where
    F: FnMut(&CollisionEvent) + Send,
{
    fn on_collision(&mut self, event: &CollisionEvent) {
        self(event)
    }
}

/// Identifies one handler registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// A handler bound to one body
pub(crate) struct Subscription {
    pub(crate) id: SubscriptionId,
    pub(crate) body: RigidBodyHandle,
    pub(crate) handler: Box<dyn PhysicsEventHandler>,
}

/// Collects the events of one `step` call
#[derive(Default)]
pub struct EventCollector {
    /// Collision events this step, in discovery order
    pub collision_events: Vec<CollisionEvent>,
}

impl EventCollector {
    /// Create a new event collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all collected events
    pub fn clear(&mut self) {
        self.collision_events.clear();
    }
}

/// Raw event captured inside the Rapier pipeline, before handles are resolved
pub(crate) struct RawCollision {
    pub(crate) collider1: rapier::ColliderHandle,
    pub(crate) collider2: rapier::ColliderHandle,
    pub(crate) started: bool,
    pub(crate) contacts: Vec<ContactData>,
    pub(crate) impact_velocity: f32,
}

/// Channel-based event collector handed to Rapier
pub(crate) struct ChannelEventCollector {
    pub(crate) collisions: crossbeam_channel::Sender<RawCollision>,
}

impl rapier::EventHandler for ChannelEventCollector {
    fn handle_collision_event(
        &self,
        bodies: &rapier::RigidBodySet,
        colliders: &rapier::ColliderSet,
        event: rapier::CollisionEvent,
        contact_pair: Option<&rapier::ContactPair>,
    ) {
        let (h1, h2, started) = match event {
            rapier::CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
            rapier::CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
        };

        let (contacts, impact_velocity) = match (started, contact_pair) {
            (true, Some(pair)) => measure_impact(bodies, colliders, pair),
            _ => (Vec::new(), 0.0),
        };

        let _ = self.collisions.send(RawCollision {
            collider1: h1,
            collider2: h2,
            started,
            contacts,
            impact_velocity,
        });
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        _contact_pair: &rapier::ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

/// Extract world-space contacts and the largest approach speed along the normal.
///
/// Runs during narrow phase, so body velocities are still the pre-impact ones.
fn measure_impact(
    bodies: &rapier::RigidBodySet,
    colliders: &rapier::ColliderSet,
    pair: &rapier::ContactPair,
) -> (Vec<ContactData>, f32) {
    let (Some(c1), Some(c2)) = (colliders.get(pair.collider1), colliders.get(pair.collider2)) else {
        return (Vec::new(), 0.0);
    };

    let body1 = c1.parent().and_then(|h| bodies.get(h));
    let body2 = c2.parent().and_then(|h| bodies.get(h));

    let mut contacts = Vec::new();
    let mut impact = 0.0f32;

    for manifold in &pair.manifolds {
        let normal = c1.position() * manifold.local_n1;
        for point in &manifold.points {
            let world_point = c1.position() * point.local_p1;

            let v1 = body1
                .map(|b| b.velocity_at_point(&world_point))
                .unwrap_or_else(rapier::Vector::zeros);
            let v2 = body2
                .map(|b| b.velocity_at_point(&world_point))
                .unwrap_or_else(rapier::Vector::zeros);

            impact = impact.max((v1 - v2).dot(&normal));

            contacts.push(ContactData {
                point: [world_point.x, world_point.y, world_point.z],
                normal: [normal.x, normal.y, normal.z],
                depth: point.dist,
            });
        }
    }

    (contacts, impact)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(started: bool, contacts: Vec<ContactData>) -> CollisionEvent {
        CollisionEvent {
            collider1: ColliderHandle(rapier::ColliderHandle::from_raw_parts(0, 0)),
            collider2: ColliderHandle(rapier::ColliderHandle::from_raw_parts(1, 0)),
            body1: Some(RigidBodyHandle(rapier::RigidBodyHandle::from_raw_parts(0, 0))),
            body2: None,
            event_type: if started {
                CollisionEventType::Started
            } else {
                CollisionEventType::Stopped
            },
            contacts,
            impact_velocity: if started { 2.0 } else { 0.0 },
        }
    }

    #[test]
    fn test_involves() {
        let e = event(true, Vec::new());
        assert!(e.involves(RigidBodyHandle(rapier::RigidBodyHandle::from_raw_parts(0, 0))));
        assert!(!e.involves(RigidBodyHandle(rapier::RigidBodyHandle::from_raw_parts(1, 0))));
    }

    #[test]
    fn test_average_contact_point() {
        let contact = |x: f32| ContactData {
            point: [x, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            depth: 0.0,
        };
        let e = event(true, vec![contact(1.0), contact(3.0)]);
        assert_eq!(e.average_contact_point(), Some([2.0, 0.0, 0.0]));
        assert_eq!(event(false, Vec::new()).average_contact_point(), None);
    }

    #[test]
    fn test_collector_clear() {
        let mut collector = EventCollector::new();
        collector.collision_events.push(event(true, Vec::new()));
        collector.collision_events.push(event(false, Vec::new()));
        assert!(collector.collision_events[1].is_stopped());
        collector.clear();
        assert!(collector.collision_events.is_empty());
    }

    #[test]
    fn test_closure_handler() {
        let mut seen = 0;
        {
            let mut handler = |e: &CollisionEvent| {
                if e.is_started() {
                    seen += 1;
                }
            };
            handler.on_collision(&event(true, Vec::new()));
            handler.on_collision(&event(false, Vec::new()));
        }
        assert_eq!(seen, 1);
    }
}
