//! The texture sampling hierarchy: solid colors, procedural checkers,
//! image lookups, and directional cubemaps, unified behind one
//! `Sample(u, v, p, dir) -> Color` signature so the skybox and material
//! albedo code paths can share call sites.

use crate::image_buf::{HdrImage, Image};
use crate::math::{Color, Point3, Vec3};
use crate::scene::{Scene, TextureId};

/// The backing pixel source for [`Texture::ImageTex`]: either an 8-bit
/// gamma-encoded LDR raster, or a linear-light HDR raster whose values can
/// exceed `1.0` (loaded from a `.hdr` Radiance file).
#[derive(Debug, Clone)]
pub enum ImageSource {
    Ldr(Image),
    Hdr { image: HdrImage, hdr_range: f64 },
}

impl ImageSource {
    fn dims(&self) -> (u32, u32) {
        match self {
            ImageSource::Ldr(img) => (img.width(), img.height()),
            ImageSource::Hdr { image, .. } => (image.width(), image.height()),
        }
    }

    fn fetch(&self, px: u32, py: u32) -> Color {
        match self {
            ImageSource::Ldr(img) => img.get(px, py),
            ImageSource::Hdr { image, hdr_range } => {
                let c = image.get(px, py);
                if hdr_range.is_finite() {
                    Color::new(
                        c.x.min(*hdr_range),
                        c.y.min(*hdr_range),
                        c.z.min(*hdr_range),
                    )
                } else {
                    c
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Texture {
    Solid(Color),
    Checker3D {
        scale: f64,
        even: TextureId,
        odd: TextureId,
    },
    CheckerUv {
        scale: f64,
        even: TextureId,
        odd: TextureId,
    },
    ImageTex(ImageSource),
    Cubemap {
        /// Order: +X, -X, +Y, -Y, +Z, -Z.
        faces: [ImageSource; 6],
    },
}

impl Texture {
    pub fn sample(&self, u: f64, v: f64, p: Point3, dir: Vec3, scene: &Scene) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker3D { scale, even, odd } => {
                let parity = (scale * p.x).floor() as i64
                    + (scale * p.y).floor() as i64
                    + (scale * p.z).floor() as i64;
                let child = if parity.rem_euclid(2) == 0 { *even } else { *odd };
                scene.sample_texture(child, u, v, p, dir)
            }
            Texture::CheckerUv { scale, even, odd } => {
                let parity = (scale * u).floor() as i64 + (scale * v).floor() as i64;
                let child = if parity.rem_euclid(2) == 0 { *even } else { *odd };
                scene.sample_texture(child, u, v, p, dir)
            }
            Texture::ImageTex(source) => sample_image_source(source, u, v),
            Texture::Cubemap { faces } => {
                let d = dir.normalized();
                let (face, s, t) = cubemap_face_and_uv(d);
                sample_image_source(&faces[face], s, t)
            }
        }
    }
}

fn sample_image_source(source: &ImageSource, u: f64, v: f64) -> Color {
    let uu = u.fract().rem_euclid(1.0);
    let vv = 1.0 - v.fract().rem_euclid(1.0);
    let (w, h) = source.dims();
    let px = (uu * (w.max(1) - 1) as f64).floor() as u32;
    let py = (vv * (h.max(1) - 1) as f64).floor() as u32;
    source.fetch(px, py)
}

/// Face selection and local `(s, t)` per spec §4.4's table, remapped from
/// `[-1, 1]` to `[0, 1]`.
pub fn cubemap_face_and_uv(dir: Vec3) -> (usize, f64, f64) {
    let (dx, dy, dz) = (dir.x, dir.y, dir.z);
    let m = dir.max_component();

    let (face, s, t) = if dx == m {
        (0usize, -dz / m, -dy / m)
    } else if dx == -m {
        (1usize, dz / m, -dy / m)
    } else if dy == m {
        (2usize, dx / m, dz / m)
    } else if dy == -m {
        (3usize, dx / m, -dz / m)
    } else if dz == m {
        (4usize, dx / m, -dy / m)
    } else {
        (5usize, -dx / m, -dy / m)
    };

    (face, s * 0.5 + 0.5, t * 0.5 + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubemap_faces_match_axis_unit_vectors() {
        let cases = [
            (Vec3::new(1.0, 0.0, 0.0), 0usize),
            (Vec3::new(-1.0, 0.0, 0.0), 1usize),
            (Vec3::new(0.0, 1.0, 0.0), 2usize),
            (Vec3::new(0.0, -1.0, 0.0), 3usize),
            (Vec3::new(0.0, 0.0, 1.0), 4usize),
            (Vec3::new(0.0, 0.0, -1.0), 5usize),
        ];
        for (dir, expected_face) in cases {
            let (face, s, t) = cubemap_face_and_uv(dir);
            assert_eq!(face, expected_face);
            assert!((s - 0.5).abs() < 1e-9);
            assert!((t - 0.5).abs() < 1e-9);
        }
    }
}
