//! Renderer contract and the headless renderer

use crate::camera::PerspectiveCamera;
use crate::scene::Scene;
use crate::viewport::Viewport;

/// Errors a renderer can report for a frame
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The drawing surface is gone or unusable
    #[error("Surface error: {0}")]
    Surface(String),
    /// Frame could not be drawn
    #[error("Execute error: {0}")]
    Execute(String),
}

/// Summary of one rendered frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Meshes drawn
    pub meshes: usize,
    /// Meshes whose origin is inside the camera frustum
    pub visible: usize,
    /// Triangles submitted
    pub triangles: u64,
    /// Meshes drawn into the shadow map
    pub shadow_casters: usize,
}

/// Something that can draw a scene from a camera
pub trait Renderer {
    /// Handle resize
    fn resize(&mut self, viewport: Viewport);

    /// Draw one frame
    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<FrameStats, RenderError>;
}

/// Renderer that draws nothing and only gathers frame statistics
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    viewport: Viewport,
    frames: u64,
    last: FrameStats,
}

impl HeadlessRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of frames rendered
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Statistics of the latest frame
    pub fn last_frame(&self) -> FrameStats {
        self.last
    }
}

impl Renderer for HeadlessRenderer {
    fn resize(&mut self, viewport: Viewport) {
        let (w, h) = viewport.physical_size();
        log::debug!("Headless renderer resized to {}x{} ({}x)", w, h, viewport.pixel_ratio());
        self.viewport = viewport;
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<FrameStats, RenderError> {
        let mut stats = FrameStats::default();
        for (_, mesh) in scene.iter() {
            stats.meshes += 1;
            if camera.sees(mesh.transform.position) {
                stats.visible += 1;
            }
            stats.triangles += u64::from(mesh.geometry.triangle_count());
            if mesh.cast_shadow {
                stats.shadow_casters += 1;
            }
        }

        self.frames += 1;
        self.last = stats;
        log::trace!(
            "Frame {}: {} meshes ({} visible), {} triangles",
            self.frames,
            stats.meshes,
            stats.visible,
            stats.triangles
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::StandardMaterial;
    use crate::mesh::{Geometry, Mesh, Transform};
    use glam::Vec3;

    #[test]
    fn test_headless_counts_frames() {
        let ahead = Transform::from_position(Vec3::new(0.0, 0.0, -5.0));
        let floor = Geometry::Plane {
            width: 500.0,
            height: 500.0,
        };

        let mut scene = Scene::new();
        scene.add(
            Mesh::new(Geometry::Box, StandardMaterial::default())
                .with_transform(ahead)
                .with_cast_shadow(true),
        );
        scene.add(Mesh::new(floor, StandardMaterial::default()));

        let mut renderer = HeadlessRenderer::new(Viewport::default());
        let stats = renderer.render(&scene, &PerspectiveCamera::default()).unwrap();

        assert_eq!(stats.meshes, 2);
        // The floor sits on the camera itself, behind the near plane.
        assert_eq!(stats.visible, 1);
        assert_eq!(stats.triangles, 14);
        assert_eq!(stats.shadow_casters, 1);
        assert_eq!(renderer.frame_count(), 1);
    }

    #[test]
    fn test_resize_stores_viewport() {
        let mut renderer = HeadlessRenderer::default();
        renderer.resize(Viewport::new(640, 480, 2.5));
        assert_eq!(renderer.viewport().physical_size(), (1280, 960));
    }
}
