//! Tumble - interactive rigid-body sandbox
//!
//! Spheres, boxes and cylinders are dropped onto a floor and left to
//! tumble. Every spawned object is a pair: a body in the physics world and
//! a mesh in the scene. Each frame the world is stepped and the pose of
//! every body is copied onto its mesh.
//!
//! # Architecture
//!
//! ```text
//! FrameLoop
//!   commands ─► Session ─► step ─► sync ─► orbit ─► render
//!                  │
//!      ┌───────────┼─────────────┬───────────────┐
//!      ▼           ▼             ▼               ▼
//! PhysicsWorld   Scene     ObjectRegistry     HitSound
//!  (bodies)    (meshes)       (pairs)       (shared cue)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tumble_sandbox::prelude::*;
//!
//! let config = SandboxConfig::load()?;
//! let mut session = Session::initialize(&config, Box::new(MutedCue::new()));
//! session.spawn_initial_objects(&config.initial_objects)?;
//!
//! let renderer = HeadlessRenderer::new(Viewport::default());
//! let mut frame_loop = FrameLoop::from_config(session, &config, renderer);
//! frame_loop.run()?;
//! ```

pub mod appearance;
pub mod config;
pub mod control;
pub mod error;
pub mod frame_loop;
pub mod hit_sound;
pub mod registry;
pub mod session;
pub mod shapes;

pub mod prelude {
    pub use crate::appearance::AppearanceFactory;
    pub use crate::config::{InitialObject, SandboxConfig};
    pub use crate::control::{execute, ControlCommand, ControlOutcome, SoundSwitch};
    pub use crate::error::{Result, SandboxError};
    pub use crate::frame_loop::{
        CancellationToken, FrameClock, FrameLoop, FrameReport, FrameTime, LoopExit,
    };
    pub use crate::hit_sound::{HitSound, HitSoundHook, DEFAULT_IMPACT_THRESHOLD};
    pub use crate::registry::{ObjectRecord, ObjectRegistry};
    pub use crate::session::{Floor, Session};
    pub use crate::shapes::{CylinderCollider, ShapeCatalog, ShapeKind, ShapeSpec};
    pub use tumble_audio::{AudioCue, MutedCue};
    pub use tumble_render::{HeadlessRenderer, Renderer, Viewport};
}
