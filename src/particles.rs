use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use super::constants::{PARTICLE_RADIUS_MAX, PARTICLE_RADIUS_MIN, PARTICLE_SPEED_MAX, PARTICLE_SPEED_MIN};

/// Circular orbit around an arbitrary axis through the origin.
#[derive(Clone, Copy, Debug)]
pub struct Orbit {
    pub radius: f32,
    pub phase: f32,
    pub speed: f32,
    u: Vec3,
    v: Vec3,
}

impl Orbit {
    pub fn new(axis: Vec3, radius: f32, phase: f32, speed: f32) -> Self {
        let axis = axis.normalize_or_zero();
        let axis = if axis == Vec3::ZERO { Vec3::Y } else { axis };
        let (u, v) = axis.any_orthonormal_pair();
        Self {
            radius,
            phase,
            speed,
            u,
            v,
        }
    }

    #[inline]
    pub fn position(&self, time: f32) -> Vec3 {
        let a = self.phase + self.speed * time;
        (self.u * a.cos() + self.v * a.sin()) * self.radius
    }
}

fn random_unit_vector(rng: &mut impl Rng) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Fixed-size cloud of orbiting points; positions are recomputed on the CPU each frame.
#[derive(Clone, Debug)]
pub struct ParticleCloud {
    orbits: Vec<Orbit>,
    positions: Vec<[f32; 3]>,
}

impl ParticleCloud {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let orbits = (0..count)
            .map(|_| {
                Orbit::new(
                    random_unit_vector(&mut rng),
                    rng.gen_range(PARTICLE_RADIUS_MIN..=PARTICLE_RADIUS_MAX),
                    rng.gen_range(0.0..TAU),
                    rng.gen_range(PARTICLE_SPEED_MIN..=PARTICLE_SPEED_MAX),
                )
            })
            .collect();
        Self::from_orbits(orbits)
    }

    pub fn from_orbits(orbits: Vec<Orbit>) -> Self {
        let positions = orbits.iter().map(|o| o.position(0.0).to_array()).collect();
        Self { orbits, positions }
    }

    pub fn len(&self) -> usize {
        self.orbits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbits.is_empty()
    }

    #[cfg(test)]
    pub fn orbits(&self) -> &[Orbit] {
        &self.orbits
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn update(&mut self, time: f32) -> &[[f32; 3]] {
        for (slot, orbit) in self.positions.iter_mut().zip(&self.orbits) {
            *slot = orbit.position(time).to_array();
        }
        &self.positions
    }
}
