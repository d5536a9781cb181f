//! Scene: meshes and lights

use crate::color::Color;
use crate::mesh::Mesh;
use glam::Vec3;

/// Handle to a mesh in a [`Scene`].
///
/// Handles carry a generation, so a handle to a removed mesh never resolves
/// to a mesh added later in the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    mesh: Option<Mesh>,
}

/// Uniform light reaching every surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Shadow map parameters of a directional light
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowSettings {
    /// Shadow map resolution (square)
    pub map_size: u32,
    /// Far plane of the shadow camera
    pub far: f32,
    /// Half-size of the orthographic shadow frustum
    pub extent: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            map_size: 1024,
            far: 15.0,
            extent: 7.0,
        }
    }
}

/// Sun-like light shining from `position` towards the origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    /// Shadow casting, if enabled
    pub shadow: Option<ShadowSettings>,
}

impl DirectionalLight {
    /// Unit vector the light travels along
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }
}

/// Everything the renderer draws
#[derive(Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    pub ambient: Option<AmbientLight>,
    pub directional: Vec<DirectionalLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh and return its handle
    pub fn add(&mut self, mesh: Mesh) -> MeshHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.mesh = Some(mesh);
            return MeshHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            mesh: Some(mesh),
        });
        MeshHandle { index, generation: 0 }
    }

    /// Remove a mesh, returning it if the handle was live
    pub fn remove(&mut self, handle: MeshHandle) -> Option<Mesh> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }

        let mesh = slot.mesh.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(mesh)
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.mesh.as_ref())
    }

    pub fn get_mut(&mut self, handle: MeshHandle) -> Option<&mut Mesh> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.mesh.as_mut())
    }

    /// Check whether a handle refers to a mesh in the scene
    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of meshes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over all meshes with their handles
    pub fn iter(&self) -> impl Iterator<Item = (MeshHandle, &Mesh)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.mesh.as_ref().map(|mesh| {
                (
                    MeshHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    mesh,
                )
            })
        })
    }
}
