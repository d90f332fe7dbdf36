use glam::Vec3;

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest non-negative hit distance of a ray against a sphere.
///
/// A ray starting inside the sphere reports the exit point.
#[inline]
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t_near = -b - sq;
    if t_near >= 0.0 {
        return Some(t_near);
    }
    let t_far = -b + sq;
    (t_far >= 0.0).then_some(t_far)
}

/// Hit distance against a square, camera-facing billboard of the given half size.
///
/// The quad lies in the plane through `center` whose normal points at `eye`;
/// its axes are world X and Y, which holds for a camera on the Z axis.
pub fn ray_billboard(ray: &Ray, center: Vec3, half_extent: f32, eye: Vec3) -> Option<f32> {
    let normal = (eye - center).normalize_or_zero();
    let denom = ray.direction.dot(normal);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (center - ray.origin).dot(normal) / denom;
    if t < 0.0 {
        return None;
    }
    let local = ray.point_at(t) - center;
    (local.x.abs() <= half_extent && local.y.abs() <= half_extent).then_some(t)
}

/// Shapes that start a drag: the core sphere, its halo shell and the glow billboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickTargets {
    pub core_radius: f32,
    pub halo_radius: f32,
    pub glow_half_extent: f32,
}

impl PickTargets {
    pub fn hit(&self, ray: &Ray, eye: Vec3) -> bool {
        ray_sphere(ray, Vec3::ZERO, self.core_radius).is_some()
            || ray_sphere(ray, Vec3::ZERO, self.halo_radius).is_some()
            || ray_billboard(ray, Vec3::ZERO, self.glow_half_extent, eye).is_some()
    }
}
