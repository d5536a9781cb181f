//! Sandbox session
//!
//! The session owns everything one sandbox run needs: the physics world,
//! the scene, the registry pairing bodies with meshes, the static floor and
//! the shared hit-sound state. Bodies move only through `step`; meshes move
//! only through `sync`, which copies body poses onto them.

use crate::appearance::AppearanceFactory;
use crate::config::{InitialObject, SandboxConfig, SpawnConfig};
use crate::error::{Result, SandboxError};
use crate::hit_sound::HitSound;
use crate::registry::{ObjectRecord, ObjectRegistry};
use crate::shapes::{random_spawn_position, ShapeCatalog, ShapeKind, ShapeSpec};
use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;
use tumble_audio::AudioCue;
use tumble_physics::prelude::*;
use tumble_render::{
    AmbientLight, Color, DirectionalLight, EnvironmentMap, Geometry, Mesh, MeshHandle, Scene,
    ShadowSettings, Transform,
};

/// Mass of every spawned object, whatever its size (kg)
pub const OBJECT_MASS: f32 = 1.0;

/// The static ground: a plane body and its mesh
#[derive(Debug, Clone, Copy)]
pub struct Floor {
    pub body: RigidBodyHandle,
    pub mesh: MeshHandle,
}

/// One sandbox run
pub struct Session {
    physics: PhysicsWorld,
    scene: Scene,
    registry: ObjectRegistry,
    floor: Floor,
    catalog: ShapeCatalog,
    appearance: AppearanceFactory,
    hit_sound: Arc<HitSound>,
    spawn: SpawnConfig,
    /// Shape and position draws for random spawns
    rng: ChaCha8Rng,
}

impl Session {
    /// Build the world, scene and floor described by `config`
    pub fn initialize(config: &SandboxConfig, cue: Box<dyn AudioCue>) -> Self {
        let mut seeds = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut child_rng =
            || ChaCha8Rng::from_rng(&mut seeds).unwrap_or_else(|_| ChaCha8Rng::from_entropy());

        let rng = child_rng();
        let appearance = AppearanceFactory::new(
            EnvironmentMap::from_directory(&config.environment.env_map_dir),
            child_rng(),
        );
        let hit_sound = Arc::new(HitSound::new(
            cue,
            config.sound.enabled,
            config.sound.threshold,
            child_rng(),
        ));

        let mut physics = PhysicsWorld::new(config.physics.clone());
        let mut scene = Scene::new();

        scene.ambient = Some(AmbientLight {
            color: Color::WHITE,
            intensity: 2.1,
        });
        scene.directional.push(DirectionalLight {
            color: Color::WHITE,
            intensity: 0.6,
            position: Vec3::new(5.0, 5.0, 5.0),
            shadow: Some(ShadowSettings::default()),
        });

        // Plane normal is local +Z; a quarter turn about -X points it up.
        let floor_body = physics.create_rigid_body(
            RigidBodyDesc::fixed().with_rotation_axis_angle([-1.0, 0.0, 0.0], FRAC_PI_2),
        );
        physics.create_collider(ColliderDesc::new(ColliderShape::Plane), Some(floor_body));

        let size = config.environment.floor_size;
        let floor_mesh = scene.add(
            Mesh::new(
                Geometry::Plane {
                    width: size,
                    height: size,
                },
                appearance.floor_material(),
            )
            .with_transform(Transform::IDENTITY.with_rotation(Quat::from_rotation_x(-FRAC_PI_2)))
            .with_receive_shadow(true),
        );

        log::info!(
            "Session initialized: gravity {:?}, sound {}",
            physics.gravity(),
            if hit_sound.is_enabled() { "on" } else { "off" }
        );

        Self {
            physics,
            scene,
            registry: ObjectRegistry::new(),
            floor: Floor {
                body: floor_body,
                mesh: floor_mesh,
            },
            catalog: ShapeCatalog::new(config.cylinder_collider),
            appearance,
            hit_sound,
            spawn: config.spawn.clone(),
            rng,
        }
    }

    /// Spawn one object: mesh and body at `position`, hit-sound hook attached
    pub fn create(&mut self, spec: ShapeSpec, position: [f32; 3]) -> Result<ObjectRecord> {
        let build = self.catalog.build(&spec);

        let [x, y, z] = position;
        let body = self.physics.create_rigid_body(RigidBodyDesc::dynamic().with_position(x, y, z));
        self.physics
            .create_collider(ColliderDesc::new(build.collider).with_mass(OBJECT_MASS), Some(body));

        let subscription = match self.physics.subscribe(body, Box::new(self.hit_sound.hook())) {
            Ok(id) => id,
            Err(e) => {
                let _ = self.physics.remove_rigid_body(body);
                return Err(e.into());
            }
        };

        let transform = Transform::from_position(Vec3::from_array(position));
        let transform = transform.with_scale(build.scale);
        let mesh = self.scene.add(
            Mesh::new(build.geometry, self.appearance.random_material())
                .with_transform(transform)
                .with_cast_shadow(true),
        );

        let record = ObjectRecord {
            mesh,
            body,
            subscription,
            kind: spec.kind(),
        };
        self.registry.push(record);

        log::debug!("Created {:?} at {:?}", spec, position);
        Ok(record)
    }

    /// Spawn a randomly sized object of `kind` at a random spawn point
    pub fn create_random(&mut self, kind: ShapeKind) -> Result<ObjectRecord> {
        let spec = ShapeSpec::random(kind, &mut self.rng);
        let position = random_spawn_position(&mut self.rng, self.spawn.spread, self.spawn.height);
        self.create(spec, position)
    }

    /// Spawn the configured startup objects
    pub fn spawn_initial_objects(&mut self, objects: &[InitialObject]) -> Result<usize> {
        for object in objects {
            self.create(object.shape, object.position)?;
        }
        Ok(objects.len())
    }

    /// Remove every spawned object; the floor stays. Returns how many went.
    pub fn reset(&mut self) -> usize {
        let records: Vec<ObjectRecord> = self.registry.drain().collect();

        for record in &records {
            if let Err(e) = self.physics.unsubscribe(record.subscription) {
                log::warn!("Reset: {}", e);
            }
            if let Err(e) = self.physics.remove_rigid_body(record.body) {
                log::warn!("Reset: {}", e);
            }
            if self.scene.remove(record.mesh).is_none() {
                log::warn!("Reset: mesh {:?} already gone", record.mesh);
            }
        }

        log::info!("Reset: removed {} objects", records.len());
        records.len()
    }

    /// Advance the simulation by `delta` seconds. Returns the internal steps taken.
    pub fn step(&mut self, delta: f32) -> u32 {
        let config = self.physics.config();
        let (fixed, max_substeps) = (config.timestep, config.max_substeps);
        self.physics.step(fixed, delta, max_substeps)
    }

    /// Copy every body's pose onto its mesh
    pub fn sync(&mut self) -> Result<()> {
        for record in self.registry.iter() {
            let pose = self.physics.get_body_pose(record.body)?;
            let mesh = self
                .scene
                .get_mut(record.mesh)
                .ok_or(SandboxError::MissingMesh(record.mesh))?;
            mesh.set_pose(Vec3::from_array(pose.position), Quat::from_array(pose.rotation));
        }
        Ok(())
    }

    pub fn sound_enabled(&self) -> bool {
        self.hit_sound.is_enabled()
    }

    pub fn set_sound_enabled(&self, enabled: bool) {
        self.hit_sound.set_enabled(enabled);
    }

    /// Flip the sound switch and return the new state
    pub fn toggle_sound(&self) -> bool {
        self.hit_sound.toggle()
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    pub fn hit_sound(&self) -> &Arc<HitSound> {
        &self.hit_sound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tumble_audio::MutedCue;

    fn session() -> Session {
        let config = SandboxConfig {
            seed: Some(9),
            ..Default::default()
        };
        Session::initialize(&config, Box::new(MutedCue::new()))
    }

    #[test]
    fn test_initialize_adds_floor_only() {
        let session = session();
        assert_eq!(session.physics().body_count(), 1);
        assert_eq!(session.scene().len(), 1);
        assert!(session.registry().is_empty());

        let floor = session.floor();
        let pose = session.physics().get_body_pose(floor.body).unwrap();
        let up = Quat::from_array(pose.rotation) * Vec3::Z;
        assert!(up.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_create_pairs_mesh_and_body() {
        let mut session = session();
        let record = session
            .create(ShapeSpec::Box { width: 1.0, height: 1.5, depth: 2.0 }, [0.0, 3.0, 0.0])
            .unwrap();

        assert_eq!(record.kind, ShapeKind::Box);
        let mesh = session.scene().get(record.mesh).unwrap();
        assert_eq!(mesh.transform.position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(mesh.transform.scale, Vec3::new(1.0, 1.5, 2.0));
        assert!(mesh.cast_shadow);
        assert!(session.physics().contains_body(record.body));
        assert!((session.physics().get_body_mass(record.body).unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(session.physics().subscription_count(), 1);
    }

    #[test]
    fn test_reset_keeps_floor() {
        let mut session = session();
        for kind in ShapeKind::ALL {
            session.create_random(kind).unwrap();
        }
        assert_eq!(session.reset(), 3);
        assert_eq!(session.physics().body_count(), 1);
        assert_eq!(session.physics().subscription_count(), 0);
        assert!(session.scene().contains(session.floor().mesh));
        assert_eq!(session.reset(), 0);
    }

    #[test]
    fn test_sync_reports_missing_mesh() {
        let mut session = session();
        let record = session.create(ShapeSpec::Sphere { radius: 0.5 }, [0.0, 3.0, 0.0]).unwrap();
        session.scene.remove(record.mesh);
        assert!(matches!(session.sync(), Err(SandboxError::MissingMesh(_))));
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = session();
        let mut b = session();
        for kind in ShapeKind::ALL {
            let ra = a.create_random(kind).unwrap();
            let rb = b.create_random(kind).unwrap();
            let ma = a.scene().get(ra.mesh).unwrap();
            let mb = b.scene().get(rb.mesh).unwrap();
            assert_eq!(ma.transform, mb.transform);
            assert_eq!(ma.material.color, mb.material.color);
        }
    }
}
