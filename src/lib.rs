//! Library surface for the path tracer, so integration tests and `main.rs`
//! share one module tree.

pub mod camera;
pub mod codec;
pub mod error;
pub mod hittable;
pub mod image_buf;
pub mod interval;
pub mod material;
pub mod math;
pub mod postprocess;
pub mod renderer;
pub mod rng;
pub mod scene;
pub mod scene_loader;
pub mod texture;
pub mod util;
