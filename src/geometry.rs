use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        }
    }
}

/// CPU-side triangle mesh, uploaded once at mount.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    #[cfg(test)]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// UV sphere with outward-facing counter-clockwise triangles.
///
/// `uv.x` runs around the equator, `uv.y` from the north pole (0) to the south pole (1).
pub fn sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

    for ring in 0..=rings {
        let phi = std::f32::consts::PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let n = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
            let uv = [seg as f32 / segments as f32, ring as f32 / rings as f32];
            vertices.push(Vertex::new(n * radius, n, uv));
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;
            indices.extend_from_slice(&[current, current + 1, next]);
            indices.extend_from_slice(&[current + 1, next + 1, next]);
        }
    }

    MeshData { vertices, indices }
}

/// Grid indices for a `(rows + 1) x (cols + 1)` vertex lattice.
fn grid_indices(rows: u32, cols: u32) -> Vec<u32> {
    let stride = cols + 1;
    let mut indices = Vec::with_capacity((rows * cols * 6) as usize);
    for j in 1..=rows {
        for i in 1..=cols {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    indices
}

/// Torus in the XY plane. `uv.x` is the angle around the main circle over 2π.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(((radial_segments + 1) * (tubular_segments + 1)) as usize);
    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let normal = (position - center).normalize_or_zero();
            let uv = [
                i as f32 / tubular_segments as f32,
                j as f32 / radial_segments as f32,
            ];
            vertices.push(Vertex::new(position, normal, uv));
        }
    }
    MeshData {
        vertices,
        indices: grid_indices(radial_segments, tubular_segments),
    }
}

/// Point on a closed uniform Catmull-Rom spline, `t` in `[0, 1)`.
pub fn catmull_rom_closed(points: &[Vec3], t: f32) -> Vec3 {
    let n = points.len();
    if n == 0 {
        return Vec3::ZERO;
    }
    let scaled = t.rem_euclid(1.0) * n as f32;
    let i = (scaled.floor() as usize) % n;
    let f = scaled - scaled.floor();
    let p0 = points[(i + n - 1) % n];
    let p1 = points[i];
    let p2 = points[(i + 1) % n];
    let p3 = points[(i + 2) % n];
    let f2 = f * f;
    let f3 = f2 * f;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * f
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * f2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * f3)
}

/// Tube swept along a closed Catmull-Rom spline using parallel-transported frames.
///
/// `uv.x` runs along the curve, `uv.y` around the tube.
pub fn closed_tube(
    control_points: &[Vec3],
    tubular_segments: u32,
    radius: f32,
    radial_segments: u32,
) -> MeshData {
    let n = tubular_segments as usize;
    let centers: Vec<Vec3> = (0..n)
        .map(|i| catmull_rom_closed(control_points, i as f32 / n as f32))
        .collect();
    let tangents: Vec<Vec3> = (0..n)
        .map(|i| (centers[(i + 1) % n] - centers[(i + n - 1) % n]).normalize_or_zero())
        .collect();

    let mut normals = Vec::with_capacity(n);
    normals.push(tangents[0].any_orthonormal_vector());
    for i in 1..n {
        let prev = normals[i - 1];
        let axis = tangents[i - 1].cross(tangents[i]);
        let next = if axis.length_squared() > 1e-12 {
            let angle = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
            Quat::from_axis_angle(axis.normalize(), angle) * prev
        } else {
            prev
        };
        normals.push(next);
    }

    let mut vertices = Vec::with_capacity((n + 1) * (radial_segments as usize + 1));
    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=n {
            let k = i % n;
            let binormal = tangents[k].cross(normals[k]);
            let dir = (normals[k] * v.cos() + binormal * v.sin()).normalize_or_zero();
            let uv = [i as f32 / n as f32, j as f32 / radial_segments as f32];
            vertices.push(Vertex::new(centers[k] + dir * radius, dir, uv));
        }
    }

    MeshData {
        vertices,
        indices: grid_indices(radial_segments, tubular_segments),
    }
}

/// Unit quad centred on the origin in the XY plane, used for billboards.
pub fn billboard_quad() -> MeshData {
    let corners = [
        ([-0.5, -0.5], [0.0, 1.0]),
        ([0.5, -0.5], [1.0, 1.0]),
        ([-0.5, 0.5], [0.0, 0.0]),
        ([0.5, 0.5], [1.0, 0.0]),
    ];
    let vertices = corners
        .iter()
        .map(|(p, uv)| Vertex::new(Vec3::new(p[0], p[1], 0.0), Vec3::Z, *uv))
        .collect();
    MeshData {
        vertices,
        indices: vec![0, 1, 2, 2, 1, 3],
    }
}

/// Per-filament shape parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilamentParams {
    pub angle: f32,
    pub tilt: f32,
    pub scale: f32,
}

impl FilamentParams {
    /// Spread `count` filaments evenly around the Y axis with alternating tilt.
    pub fn spread(index: usize, count: usize) -> Self {
        Self {
            angle: index as f32 / count.max(1) as f32 * TAU,
            tilt: ((index % 3) as f32 - 1.0) * 0.5,
            scale: 0.8 + 0.1 * (index % 4) as f32,
        }
    }

    /// Control points of a wobbly closed loop around the origin.
    pub fn control_points(&self, count: usize, base_radius: f32) -> Vec<Vec3> {
        let orient = Quat::from_euler(EulerRot::XYZ, self.tilt, self.angle, 0.0);
        (0..count)
            .map(|k| {
                let a = k as f32 / count as f32 * TAU;
                let r = base_radius * self.scale * (1.0 + 0.25 * (3.0 * a + self.angle).sin());
                let p = Vec3::new(
                    r * a.cos(),
                    base_radius * 0.25 * (2.0 * a + self.angle).sin(),
                    r * a.sin(),
                );
                orient * p
            })
            .collect()
    }
}
