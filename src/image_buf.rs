//! Fixed-size RGB8 raster with bounds-safe access and gamma encoding on write.

use crate::math::Color;
use log::warn;

/// An owned RGB8 pixel buffer, row-major, three bytes per pixel.
///
/// Two lifecycles share this type: an owned buffer filled pixel-by-pixel by
/// the renderer, and a buffer decoded from disk by [`crate::codec`] for use
/// as an [`crate::texture::Texture::ImageTex`] source. The distinction is
/// lifecycle, not layout.
#[derive(Debug, Clone)]
pub struct Image {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl Image {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_channels(width, height, 3)
    }

    pub fn with_channels(width: u32, height: u32, channels: u8) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0u8; (width * height * channels as u32) as usize],
        }
    }

    /// Wraps pre-decoded RGB8 bytes (e.g. from [`crate::codec::load_image`]).
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * channels as u32) as usize);
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Reads the pixel at `(x, y)`, each channel divided by 255 to `[0, 1]`.
    /// Out-of-bounds reads return magenta and log a warning; this is a
    /// diagnostic fallback only and must not be relied on for correctness.
    pub fn get(&self, x: u32, y: u32) -> Color {
        if !self.in_bounds(x, y) {
            warn!(
                "texture fetch out of bounds: ({x}, {y}) on a {}x{} image",
                self.width, self.height
            );
            return Color::new(1.0, 0.0, 1.0);
        }
        let idx = ((y * self.width + x) * self.channels as u32) as usize;
        Color::new(
            self.data[idx] as f64 / 255.0,
            self.data[idx + 1] as f64 / 255.0,
            self.data[idx + 2] as f64 / 255.0,
        )
    }

    /// Writes `color` at `(x, y)`, clamping both the coordinates and the
    /// color to valid ranges, optionally gamma-encoding first, then
    /// quantizing with `⌊255.999·c⌋`.
    pub fn set(&mut self, x: u32, y: u32, color: Color, gamma: bool) {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));

        let color = if gamma { color.gamma_correct() } else { color };
        let c = color.saturate();

        let idx = ((y * self.width + x) * self.channels as u32) as usize;
        self.data[idx] = (255.999 * c.x) as u8;
        self.data[idx + 1] = (255.999 * c.y) as u8;
        self.data[idx + 2] = (255.999 * c.z) as u8;
    }
}

/// A linear-light floating point raster, used for HDR (Radiance `.hdr`)
/// texture sources where pixel values can exceed `1.0`.
#[derive(Debug, Clone)]
pub struct HdrImage {
    width: u32,
    height: u32,
    data: Vec<f64>,
}

impl HdrImage {
    pub fn from_raw(width: u32, height: u32, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        if x >= self.width || y >= self.height {
            warn!(
                "texture fetch out of bounds: ({x}, {y}) on a {}x{} HDR image",
                self.width, self.height
            );
            return Color::new(1.0, 0.0, 1.0);
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Color::new(self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }
}
