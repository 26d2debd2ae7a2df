//! Optional post-processing, applied by the caller after render and before
//! PNG write — never invoked automatically by the renderer.

use crate::image_buf::Image;
use crate::math::Color;

/// A bilateral denoiser: each output pixel is a weighted average of its
/// spatial neighborhood within `radius`, where the weight falls off both
/// with pixel distance (`sigma_space`) and color difference (`sigma_color`)
/// so edges are preserved while flat regions are smoothed.
pub fn bilateral_filter(image: &Image, radius: i32, sigma_space: f64, sigma_color: f64) -> Image {
    let width = image.width();
    let height = image.height();
    let mut out = Image::new(width, height);

    let inv_2_sigma_space2 = 1.0 / (2.0 * sigma_space * sigma_space);
    let inv_2_sigma_color2 = 1.0 / (2.0 * sigma_color * sigma_color);

    for y in 0..height {
        for x in 0..width {
            let center = image.get(x, y);
            let mut sum = Color::zero();
            let mut weight_sum = 0.0;

            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let sx = x as i32 + dx;
                    let sy = y as i32 + dy;
                    if sx < 0 || sy < 0 || sx >= width as i32 || sy >= height as i32 {
                        continue;
                    }
                    let sample = image.get(sx as u32, sy as u32);

                    let spatial_dist2 = (dx * dx + dy * dy) as f64;
                    let color_diff = sample - center;
                    let color_dist2 = color_diff.dot(color_diff);

                    let weight = (-spatial_dist2 * inv_2_sigma_space2
                        - color_dist2 * inv_2_sigma_color2)
                        .exp();

                    sum += sample * weight;
                    weight_sum += weight;
                }
            }

            let filtered = if weight_sum > 0.0 { sum / weight_sum } else { center };
            out.set(x, y, filtered, false);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_image_is_unchanged_by_filtering() {
        let mut image = Image::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                image.set(x, y, Color::new(0.5, 0.5, 0.5), false);
            }
        }
        let filtered = bilateral_filter(&image, 1, 2.0, 0.1);
        for y in 0..4 {
            for x in 0..4 {
                let c = filtered.get(x, y);
                assert!((c.x - 0.5).abs() < 1e-2);
            }
        }
    }

    #[test]
    fn strong_edge_mostly_survives_filtering() {
        let mut image = Image::new(8, 1);
        for x in 0..8 {
            let c = if x < 4 { Color::zero() } else { Color::ones() };
            image.set(x, 0, c, false);
        }
        let filtered = bilateral_filter(&image, 2, 1.5, 0.05);
        assert!(filtered.get(0, 0).x < 0.2);
        assert!(filtered.get(7, 0).x > 0.8);
    }
}
