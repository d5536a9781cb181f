//! Damped orbit controls
//!
//! Rotates and dollies a camera around a target point. Input is queued as
//! pending deltas; each `update` applies a fraction of what is pending when
//! damping is enabled, so motion eases out over several frames.

use crate::camera::PerspectiveCamera;
use glam::Vec3;

const MIN_POLAR: f32 = 1.0e-4;

/// Orbit camera controller
#[derive(Clone, Debug)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at
    pub target: Vec3,
    /// Ease motion out over several updates
    pub enable_damping: bool,
    /// Fraction of pending motion applied per update when damping
    pub damping_factor: f32,
    /// Min/max distance from the target
    pub distance_range: (f32, f32),
    /// Distance from the target
    radius: f32,
    /// Azimuth around +Y, measured from +Z
    azimuth: f32,
    /// Polar angle from +Y
    polar: f32,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_scale: f32,
}

impl OrbitControls {
    /// Create controls orbiting `target`, starting from the camera's position
    pub fn new(camera: &PerspectiveCamera, target: Vec3) -> Self {
        let mut controls = Self {
            target,
            enable_damping: false,
            damping_factor: 0.05,
            distance_range: (0.0, f32::INFINITY),
            radius: 1.0,
            azimuth: 0.0,
            polar: std::f32::consts::FRAC_PI_2,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_scale: 1.0,
        };
        controls.sync_from_camera(camera);
        controls
    }

    /// Enable damping with the given factor
    pub fn with_damping(mut self, factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Re-read the orbit angles from the camera's current position
    pub fn sync_from_camera(&mut self, camera: &PerspectiveCamera) {
        let offset = camera.position - self.target;
        self.radius = offset.length().max(f32::EPSILON);
        self.azimuth = offset.x.atan2(offset.z);
        self.polar = (offset.y / self.radius).clamp(-1.0, 1.0).acos();
    }

    /// Queue a rotation (radians): `azimuth` around Y, `polar` towards the poles
    pub fn rotate(&mut self, azimuth: f32, polar: f32) {
        self.pending_azimuth += azimuth;
        self.pending_polar += polar;
    }

    /// Queue a dolly: factors below 1 move closer, above 1 move away
    pub fn dolly(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.pending_scale *= scale;
        }
    }

    /// Distance from the target
    pub fn distance(&self) -> f32 {
        self.radius
    }

    /// Azimuth angle (radians)
    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Check whether queued motion remains
    pub fn is_moving(&self) -> bool {
        self.pending_azimuth.abs() > 1.0e-6
            || self.pending_polar.abs() > 1.0e-6
            || (self.pending_scale - 1.0).abs() > 1.0e-6
    }

    /// Apply pending motion and place the camera. Returns whether it moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let moving = self.is_moving();

        let fraction = if self.enable_damping { self.damping_factor } else { 1.0 };
        self.azimuth += self.pending_azimuth * fraction;
        self.polar = (self.polar + self.pending_polar * fraction)
            .clamp(MIN_POLAR, std::f32::consts::PI - MIN_POLAR);
        self.radius = (self.radius * self.pending_scale.powf(fraction))
            .clamp(self.distance_range.0.max(f32::EPSILON), self.distance_range.1);

        if self.enable_damping {
            self.pending_azimuth *= 1.0 - fraction;
            self.pending_polar *= 1.0 - fraction;
            self.pending_scale = self.pending_scale.powf(1.0 - fraction);
        } else {
            self.pending_azimuth = 0.0;
            self.pending_polar = 0.0;
            self.pending_scale = 1.0;
        }

        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        camera.position = self.target
            + Vec3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth) * self.radius;
        camera.look_at(self.target, Vec3::Y);

        moving
    }
}
