//! The radiance estimator and the row-parallel driver that calls it once
//! per pixel sample.

use crate::camera::RenderContext;
use crate::image_buf::Image;
use crate::interval::Interval;
use crate::math::{Color, Ray};
use crate::rng::Rng;
use crate::scene::Scene;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

/// Aggregate statistics collected during the rendering pass, printed by the
/// CLI after a render completes.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub total_rays: u64,
    pub elapsed_secs: f64,
    pub width: u32,
    pub height: u32,
    pub spp: u32,
}

impl RenderStats {
    pub fn mrays_per_sec(&self) -> f64 {
        self.total_rays as f64 / self.elapsed_secs / 1e6
    }
}

/// The recursive radiance estimator, converted to a loop for stack safety
/// at large `max_depth` (see design notes on tail-call conversion). Carries
/// a running `(throughput, emitted)` pair instead of recursing.
fn ray_color(ray: Ray, scene: &Scene, max_depth: u32, rng: &mut Rng) -> Color {
    let mut throughput = Color::ones();
    let mut radiance = Color::zero();
    let mut current = ray;

    for _ in 0..max_depth {
        match scene.hit(&current, Interval::new(0.001, f64::INFINITY)) {
            None => {
                radiance += throughput.hadamard(scene.sample_skybox(current.direction));
                return radiance;
            }
            Some(hit) => {
                let material = scene.material(hit.material);
                let emitted = material.emission(hit.u, hit.v, hit.p, scene);
                radiance += throughput.hadamard(emitted);

                match material.scatter(&current, &hit, scene, rng) {
                    None => return radiance,
                    Some(scatter) => {
                        throughput = throughput.hadamard(scatter.attenuation);
                        current = scatter.ray_out;
                    }
                }
            }
        }
    }

    radiance
}

/// Renders the full image, dispatching one independent task per row via
/// `rayon`. Each row owns its own RNG, seeded from the row index so a fixed
/// row/worker split reproduces the same pixels; the crate makes no promise
/// about cross-machine determinism beyond that.
pub fn render(
    scene: &Scene,
    camera: &RenderContext,
    width: u32,
    height: u32,
    apply_gamma: bool,
) -> (Image, RenderStats) {
    let strata = camera.strata();
    let spp = strata * strata;
    let total_rays = AtomicU64::new(0);
    let start = std::time::Instant::now();

    let progress = ProgressBar::new(height as u64);
    progress.set_style(
        ProgressStyle::with_template("  rendering [{bar:24}] {pos}/{len} rows ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let rows: Vec<Vec<Color>> = (0..height)
        .into_par_iter()
        .map(|j| {
            let mut rng = Rng::seeded(j as u64);
            let mut row = Vec::with_capacity(width as usize);
            let mut row_rays = 0u64;

            for i in 0..width {
                let mut pixel = Color::zero();
                for sj in 0..strata {
                    for si in 0..strata {
                        let ray = camera.ray_for(i, j, si, sj, &mut rng);
                        pixel += ray_color(ray, scene, camera.max_depth(), &mut rng);
                        row_rays += 1;
                    }
                }
                row.push(pixel / (strata * strata) as f64);
            }

            total_rays.fetch_add(row_rays, Ordering::Relaxed);
            log::info!("row {j} of {height} complete");
            progress.inc(1);
            row
        })
        .collect();

    progress.finish_and_clear();

    let mut image = Image::new(width, height);
    for (j, row) in rows.into_iter().enumerate() {
        for (i, color) in row.into_iter().enumerate() {
            image.set(i as u32, j as u32, color, apply_gamma);
        }
    }

    let stats = RenderStats {
        total_rays: total_rays.load(Ordering::Relaxed),
        elapsed_secs: start.elapsed().as_secs_f64(),
        width,
        height,
        spp,
    };

    (image, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;
    use crate::math::{Point3, Vec3};

    #[test]
    fn empty_scene_with_black_skybox_renders_all_black() {
        let scene = Scene::new();
        let config = CameraConfig {
            look_from: Point3::zero(),
            look_at: Point3::new(0.0, 0.0, -1.0),
            vfov_degrees: 90.0,
            defocus_angle_degrees: 0.0,
            samples: 1,
            max_depth: 1,
            focus_dist: 1.0,
        };
        let ctx = RenderContext::build(config, 8, 8);
        let (image, _) = render(&scene, &ctx, 8, 8, true);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(image.get(x, y), Color::zero());
            }
        }
    }

    #[test]
    fn miss_against_gradient_skybox_produces_nonzero_radiance() {
        use crate::scene::Skybox;
        let mut scene = Scene::new();
        scene.set_skybox(Skybox::Color(Color::new(0.5, 0.7, 1.0)));
        let ray = Ray::new(Point3::zero(), Vec3::new(0.0, 0.0, -1.0));
        let mut rng = Rng::seeded(0);
        let c = ray_color(ray, &scene, 4, &mut rng);
        assert_eq!(c, Color::new(0.5, 0.7, 1.0));
    }
}
