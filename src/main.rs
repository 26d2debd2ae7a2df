//! # arca
//!
//! An offline, CPU-based Monte Carlo path tracer. Renders a declaratively
//! described 3-D scene — camera, materials, textures, objects, optional
//! skybox — to a gamma-corrected PNG.
//!
//! ## Architecture
//!
//! - **Geometric primitives**: Sphere, Quad, scanned linearly (no BVH — the
//!   scenes this renders are small, and parallelism does the heavy lifting).
//! - **Materials**: Lambertian (diffuse + specular mix, optional normal
//!   map), Metal, Dielectric (glass), DiffuseLight.
//! - **Camera**: pinhole-with-defocus, stratified per-pixel sampling.
//!
//! ## Rendering equation
//!
//! The path tracer solves the rendering equation via Monte Carlo
//! integration:
//!
//! ```text
//!   L_o(p, ω_o) = L_e(p, ω_o) + ∫_Ω f_r(p, ω_i, ω_o) · L_i(p, ω_i) · |cos θ_i| dω_i
//! ```
//!
//! Each material's `scatter` imports the BRDF lobe's outgoing direction,
//! and the renderer loop accumulates `L_i` iteratively rather than by
//! recursing, to stay stack-safe at large bounce counts.

use arca::camera::RenderContext;
use arca::codec;
use arca::postprocess;
use arca::renderer::{self, RenderStats};
use arca::scene_loader;
use arca::util::ScopedTimer;
use clap::Parser;
use std::path::PathBuf;

/// arca — offline Monte Carlo path tracer
#[derive(Parser, Debug)]
#[command(
    name = "arca",
    version,
    about = "An offline CPU Monte Carlo path tracer",
    long_about = "Renders a declaratively described 3-D scene to a \
                  gamma-corrected PNG using stratified Monte Carlo path \
                  tracing.",
    after_help = "EXAMPLES:\n  \
                  arca scene.yaml\n  \
                  arca scene.yaml --out render.png --spp 256 --bounces 32\n  \
                  arca scene.yaml --denoise --denoise-radius 3\n  \
                  arca scene.yaml -v"
)]
struct Cli {
    /// Path to the scene description (YAML)
    scene: PathBuf,

    /// Output PNG path override (default: the scene's own `output.file_name`)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Image width override
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Image height override
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Samples-per-pixel override
    #[arg(long)]
    spp: Option<u32>,

    /// Maximum ray bounce depth override
    #[arg(long)]
    bounces: Option<u32>,

    /// Write linear-light output instead of gamma-correcting
    #[arg(long)]
    no_gamma: bool,

    /// Apply a bilateral-filter denoise pass between render and PNG write
    #[arg(long)]
    denoise: bool,

    /// Bilateral filter radius, in pixels (only with --denoise)
    #[arg(long, default_value_t = 2)]
    denoise_radius: i32,

    /// Bilateral filter spatial sigma (only with --denoise)
    #[arg(long, default_value_t = 2.0)]
    denoise_sigma_space: f64,

    /// Bilateral filter color sigma (only with --denoise)
    #[arg(long, default_value_t = 0.1)]
    denoise_sigma_color: f64,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn print_header(scene_path: &std::path::Path, width: u32, height: u32, samples: u32, bounces: u32) {
    eprintln!();
    eprintln!("  arca — Monte Carlo path tracer");
    eprintln!("  scene:      {}", scene_path.display());
    eprintln!("  resolution: {width}×{height}");
    eprintln!("  samples:    {samples} spp");
    eprintln!("  bounces:    {bounces}");
    eprintln!();
}

fn print_summary(stats: &RenderStats) {
    eprintln!();
    eprintln!("  time:   {:.2}s", stats.elapsed_secs);
    eprintln!("  rays:   {:.2}M total", stats.total_rays as f64 / 1e6);
    eprintln!("  speed:  {:.2} Mrays/s", stats.mrays_per_sec());
    eprintln!(
        "  image:  {}×{} @ {} spp",
        stats.width, stats.height, stats.spp
    );
    eprintln!();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut loaded = scene_loader::load_scene(&cli.scene)?;

    let width = cli.width.unwrap_or(loaded.width);
    let height = cli.height.unwrap_or(loaded.height);
    if let Some(spp) = cli.spp {
        loaded.camera.samples = spp;
    }
    if let Some(bounces) = cli.bounces {
        loaded.camera.max_depth = bounces;
    }

    print_header(&cli.scene, width, height, loaded.camera.samples, loaded.camera.max_depth);

    let context = RenderContext::build(loaded.camera, width, height);

    let (mut image, stats) = {
        let _timer = ScopedTimer::new("render");
        renderer::render(&loaded.scene, &context, width, height, !cli.no_gamma)
    };

    print_summary(&stats);

    if cli.denoise {
        let _timer = ScopedTimer::new("denoise");
        image = postprocess::bilateral_filter(
            &image,
            cli.denoise_radius,
            cli.denoise_sigma_space,
            cli.denoise_sigma_color,
        );
    }

    let out_path = cli.out.unwrap_or_else(|| PathBuf::from(&loaded.file_name));
    {
        let _timer = ScopedTimer::new("png write");
        codec::save_png(&image, &out_path)?;
    }

    eprintln!("  wrote {}", out_path.display());
    Ok(())
}
