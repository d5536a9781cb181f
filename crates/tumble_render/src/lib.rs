//! Tumble Render - render environment
//!
//! Scene description types shared by the sandbox and whatever draws it:
//! colors and metallic-roughness materials, unit primitive geometry, a
//! mesh store with generational handles, a perspective camera with damped
//! orbit controls, and the [`Renderer`] contract.
//!
//! The crate ships a [`HeadlessRenderer`] that walks the scene without a
//! GPU; windowed backends implement the same trait.

pub mod camera;
pub mod color;
pub mod material;
pub mod mesh;
pub mod orbit;
pub mod renderer;
pub mod scene;
pub mod viewport;

pub mod prelude {
    pub use crate::camera::PerspectiveCamera;
    pub use crate::color::{Color, ParseColorError};
    pub use crate::material::{EnvironmentMap, StandardMaterial};
    pub use crate::mesh::{Geometry, Mesh, Transform};
    pub use crate::orbit::OrbitControls;
    pub use crate::renderer::{FrameStats, HeadlessRenderer, RenderError, Renderer};
    pub use crate::scene::{AmbientLight, DirectionalLight, MeshHandle, Scene, ShadowSettings};
    pub use crate::viewport::{Viewport, MAX_PIXEL_RATIO};
    pub use glam::{Mat4, Quat, Vec3};
}

pub use prelude::*;
