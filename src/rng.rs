//! Per-thread random sampling primitives.
//!
//! Each render worker owns one [`Rng`]; it is never shared across threads
//! (see spec §5 "RNG"). The row-parallel driver seeds one per row, so pixel
//! values are reproducible for a fixed row/worker split even though the
//! crate makes no promise that the *order* rows are dispatched in is
//! reproducible across machines.

use crate::math::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng as _, SeedableRng};

pub struct Rng(SmallRng);

impl Rng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// `[0, 1)`
    #[inline]
    pub fn random(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    /// `[a, b)`
    #[inline]
    pub fn random_range(&mut self, a: f64, b: f64) -> f64 {
        a + (b - a) * self.random()
    }

    /// A point uniformly distributed in `[-1/2, 1/2]^2`.
    pub fn random_in_square(&mut self) -> (f64, f64) {
        (self.random() - 0.5, self.random() - 0.5)
    }

    /// A point in the stratified cell `(i, j)` of edge length `size`,
    /// re-centered to the pixel square per spec §4.1.
    pub fn random_in_stratified_square(&mut self, i: u32, j: u32, size: f64) -> (f64, f64) {
        let dx = (i as f64 + self.random()) * size - 0.5;
        let dy = (j as f64 + self.random()) * size - 0.5;
        (dx, dy)
    }

    /// Uniformly distributed unit vector via rejection sampling on the unit
    /// ball, excluding near-zero samples. This is the only sampler used for
    /// diffuse scattering in this renderer — cosine-weighted hemisphere
    /// sampling is a different (and incompatible) estimator and must not be
    /// substituted here.
    pub fn random_unit_vec(&mut self) -> Vec3 {
        loop {
            let v = Vec3::new(
                self.random_range(-1.0, 1.0),
                self.random_range(-1.0, 1.0),
                self.random_range(-1.0, 1.0),
            );
            let lensq = v.length_squared();
            if 1e-160 < lensq && lensq <= 1.0 {
                return v / lensq.sqrt();
            }
        }
    }

    /// A point on the unit disk (z = 0), for defocus-disk origin jitter.
    pub fn random_on_disk(&mut self) -> Vec3 {
        loop {
            let p = Vec3::new(self.random_range(-1.0, 1.0), self.random_range(-1.0, 1.0), 0.0);
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }
}

/// Schlick's approximation to the Fresnel reflectance of a dielectric.
pub fn schlick_reflectance(cosine: f64, eta: f64) -> f64 {
    let r0 = ((1.0 - eta) / (1.0 + eta)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
