//! Object registry: the (body, mesh) pairs spawned into the session

use crate::shapes::ShapeKind;
use tumble_physics::{RigidBodyHandle, SubscriptionId};
use tumble_render::MeshHandle;

/// One spawned object: its mesh, its body and the collision hook
/// registered for the body. Both halves are created and removed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRecord {
    pub mesh: MeshHandle,
    pub body: RigidBodyHandle,
    pub subscription: SubscriptionId,
    pub kind: ShapeKind,
}

/// Records in creation order
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    records: Vec<ObjectRecord>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: ObjectRecord) {
        self.records.push(record);
    }

    /// Remove every record, oldest first
    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, ObjectRecord> {
        self.records.drain(..)
    }

    pub fn records(&self) -> &[ObjectRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records of one kind
    pub fn count_of(&self, kind: ShapeKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}
