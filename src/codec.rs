//! The `ImageCodec`/`OutputSink` external collaborator, implemented over
//! the `image` crate: decode RGB8/HDR pixel buffers from disk, encode the
//! rendered buffer to PNG.

use crate::error::EngineError;
use crate::image_buf::{HdrImage, Image};
use std::path::Path;

/// Loads an 8-bit RGB raster from any format the `image` crate recognizes
/// by content (PNG, JPEG, ...).
pub fn load_image(path: &Path) -> Result<Image, EngineError> {
    let img = image::open(path)?.into_rgb8();
    let (width, height) = img.dimensions();
    Ok(Image::from_raw(width, height, 3, img.into_raw()))
}

/// Loads a Radiance `.hdr` file into a linear-light floating point raster.
pub fn load_hdr(path: &Path) -> Result<HdrImage, EngineError> {
    let img = image::open(path)?.into_rgb32f();
    let (width, height) = img.dimensions();
    let data: Vec<f64> = img.into_raw().into_iter().map(|c| c as f64).collect();
    Ok(HdrImage::from_raw(width, height, data))
}

/// Encodes `image` as PNG at `path`, appending a `.png` extension if the
/// caller omitted one.
pub fn save_png(image: &Image, path: &Path) -> Result<(), EngineError> {
    let path = if path.extension().is_none() {
        path.with_extension("png")
    } else {
        path.to_path_buf()
    };

    let buffer = image::RgbImage::from_raw(image.width(), image.height(), image.data().to_vec())
        .expect("Image and image::RgbImage must agree on buffer length");
    buffer.save(&path)?;
    Ok(())
}
