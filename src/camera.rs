use glam::{Mat4, Vec2, Vec3, Vec4};

use super::constants::{CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR};
use super::picking::Ray;
use super::state::ViewportState;

/// Perspective camera on the +Z axis looking at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub distance: f32,
    pub fovy_radians: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(distance: f32, viewport: ViewportState) -> Self {
        Self {
            distance,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            aspect: viewport.aspect(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    #[inline]
    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    /// Recompute the aspect ratio after the container changed size.
    pub fn set_viewport(&mut self, viewport: ViewportState) {
        self.aspect = viewport.aspect();
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    /// Compute a world-space picking ray through a container-relative pixel.
    ///
    /// `px` is in the same CSS pixel space as `viewport`.
    pub fn screen_ray(&self, viewport: &ViewportState, px: Vec2) -> Ray {
        let ndc = viewport.to_ndc(px);
        let inv = (self.projection_matrix() * self.view_matrix()).inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let ro = self.eye();
        Ray::new(ro, p1 - ro)
    }
}
