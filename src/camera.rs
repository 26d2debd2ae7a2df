//! The pinhole-with-defocus camera. `CameraConfig` holds the user-facing
//! inputs (position, look-at, FOV, aperture); `RenderContext` holds the
//! values derived once per render. Splitting the two avoids mutating
//! "const" camera state across frames, since this engine only ever
//! renders one frame per `RenderContext`.

use crate::math::{Point3, Ray, Vec3};
use crate::rng::Rng;

#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub samples: u32,
    pub max_depth: u32,
    pub look_from: Point3,
    pub look_at: Point3,
    pub vfov_degrees: f64,
    pub defocus_angle_degrees: f64,
    pub focus_dist: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            samples: 16,
            max_depth: 8,
            look_from: Point3::new(0.0, 1.0, 3.0),
            look_at: Point3::zero(),
            vfov_degrees: 40.0,
            defocus_angle_degrees: 0.0,
            focus_dist: 3.0,
        }
    }
}

/// Per-render derived state: viewport basis, pixel deltas, defocus disk
/// axes, and the stratification grid edge.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    config: CameraConfig,
    pixel00: Point3,
    delta_u: Vec3,
    delta_v: Vec3,
    u_defocus: Vec3,
    v_defocus: Vec3,
    /// Stratification grid edge; actual per-pixel sample count is `strata^2`.
    strata: u32,
}

impl RenderContext {
    pub fn build(config: CameraConfig, image_width: u32, image_height: u32) -> Self {
        let theta = config.vfov_degrees.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width = viewport_height * (image_width as f64 / image_height as f64);

        let world_up = Vec3::unit_y();
        let w = (config.look_from - config.look_at).normalized();
        let u = world_up.cross(w).normalized();
        let v = w.cross(u);

        let viewport_u = u * viewport_width;
        let viewport_v = -v * viewport_height;
        let delta_u = viewport_u / image_width as f64;
        let delta_v = viewport_v / image_height as f64;

        let upper_left =
            config.look_from - w * config.focus_dist - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00 = upper_left + (delta_u + delta_v) * 0.5;

        let defocus_radius =
            config.focus_dist * (config.defocus_angle_degrees.to_radians() / 2.0).tan();
        let u_defocus = u * defocus_radius;
        let v_defocus = v * defocus_radius;

        let strata = (config.samples as f64).sqrt().floor() as u32;

        Self {
            config,
            pixel00,
            delta_u,
            delta_v,
            u_defocus,
            v_defocus,
            strata: strata.max(1),
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.config.max_depth
    }

    /// Edge length of the stratification grid; actual sample count per
    /// pixel is `strata()^2`, which may be less than the requested
    /// `samples` if it is not a perfect square.
    pub fn strata(&self) -> u32 {
        self.strata
    }

    /// A primary ray for pixel `(i, j)`, stratum `(si, sj)` out of `strata^2`.
    pub fn ray_for(&self, i: u32, j: u32, si: u32, sj: u32, rng: &mut Rng) -> Ray {
        let region_size = 1.0 / self.strata as f64;
        let (dx, dy) = rng.random_in_stratified_square(si, sj, region_size);

        let pixel_sample =
            self.pixel00 + self.delta_u * (i as f64 + dx) + self.delta_v * (j as f64 + dy);

        let origin = if self.config.defocus_angle_degrees <= 0.0 {
            self.config.look_from
        } else {
            let p = rng.random_on_disk();
            self.config.look_from + self.u_defocus * p.x + self.v_defocus * p.y
        };

        Ray::new(origin, (pixel_sample - origin).normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_on_camera_looks_down_negative_z() {
        let config = CameraConfig {
            look_from: Point3::zero(),
            look_at: Point3::new(0.0, 0.0, -1.0),
            vfov_degrees: 90.0,
            defocus_angle_degrees: 0.0,
            samples: 1,
            max_depth: 1,
            focus_dist: 1.0,
        };
        let ctx = RenderContext::build(config, 64, 36);
        let mut rng = Rng::seeded(0);
        // Center pixel of an even-width image straddles the view axis; the
        // ray's z component should be strongly negative regardless.
        let ray = ctx.ray_for(32, 18, 0, 0, &mut rng);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn strata_is_floor_of_sqrt_samples() {
        let config = CameraConfig {
            samples: 17,
            ..CameraConfig::default()
        };
        let ctx = RenderContext::build(config, 32, 32);
        assert_eq!(ctx.strata(), 4);
    }
}
