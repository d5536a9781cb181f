//! Perspective camera

use glam::{Mat4, Quat, Vec3};

/// Camera with a perspective projection
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    /// World position
    pub position: Vec3,
    /// Orientation
    pub rotation: Quat,
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl PerspectiveCamera {
    /// Create a perspective camera at the origin looking down -Z
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_degrees,
            aspect,
            near,
            far,
        }
    }

    /// Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Rotate the camera to face `target`
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        let right = forward.cross(up).normalize_or_zero();
        if right == Vec3::ZERO {
            return;
        }
        let actual_up = right.cross(forward);
        self.rotation = Quat::from_mat3(&glam::Mat3::from_cols(right, actual_up, -forward));
    }

    /// Update the aspect ratio after a resize
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation.conjugate()) * Mat4::from_translation(-self.position)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Check whether `point` lies inside the view frustum
    pub fn sees(&self, point: Vec3) -> bool {
        let clip = self.view_projection_matrix() * point.extend(1.0);
        clip.w > 0.0
            && clip.x.abs() <= clip.w
            && clip.y.abs() <= clip.w
            && (0.0..=clip.w).contains(&clip.z)
    }

    /// Get the forward direction
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 16.0 / 9.0, 0.1, 100.0)
    }
}
