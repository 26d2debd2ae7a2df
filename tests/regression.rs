//! End-to-end rendering scenarios exercising the full camera → scene →
//! material → renderer pipeline, not just individual modules.

use arca::camera::{CameraConfig, RenderContext};
use arca::hittable::{Quad, Sphere};
use arca::image_buf::Image;
use arca::material::{Albedo, Dielectric, DiffuseLight, Lambertian, Material, Metal};
use arca::math::{Color, Point3, Vec3};
use arca::renderer::render;
use arca::scene::{Object, Scene, Skybox};
use arca::texture::{cubemap_face_and_uv, ImageSource, Texture};

/// Decodes a gamma-encoded pixel back to linear space (the inverse of
/// `Vec3::gamma_correct`'s componentwise square root).
fn linear(c: Color) -> Color {
    Color::new(c.x * c.x, c.y * c.y, c.z * c.z)
}

fn patch_mean(image: &Image, x0: u32, y0: u32, w: u32, h: u32) -> Color {
    let mut sum = Color::zero();
    let mut count = 0.0;
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            sum += linear(image.get(x, y));
            count += 1.0;
        }
    }
    sum / count
}

fn straight_on_camera(samples: u32, max_depth: u32) -> CameraConfig {
    CameraConfig {
        samples,
        max_depth,
        look_from: Point3::zero(),
        look_at: Point3::new(0.0, 0.0, -1.0),
        vfov_degrees: 90.0,
        defocus_angle_degrees: 0.0,
        focus_dist: 1.0,
    }
}

// S1 — empty scene, black skybox: every pixel must be exactly zero.
#[test]
fn s1_empty_scene_black_skybox_renders_all_black() {
    let scene = Scene::new();
    let config = straight_on_camera(1, 1);
    let ctx = RenderContext::build(config, 64, 36);
    let (image, _) = render(&scene, &ctx, 64, 36, true);

    for y in 0..36 {
        for x in 0..64 {
            assert_eq!(image.get(x, y), Color::zero());
        }
    }
}

// S2 — a directional gradient skybox must survive the full camera/cubemap
// pipeline and produce a vertical gradient. Only the -Z cubemap face is
// populated since a 90° FOV camera looking down -Z keeps dz dominant near
// the center of the frame; the assertion is restricted to that region.
#[test]
fn s2_gradient_skybox_is_monotonic_vertically_near_center() {
    fn gradient_color(dir: Vec3) -> Color {
        let t = 0.5 * (dir.normalized().y + 1.0);
        Color::ones().lerp(Color::new(0.5, 0.7, 1.0), t)
    }

    const RES: u32 = 64;
    let mut neg_z_face = Image::new(RES, RES);
    for py in 0..RES {
        for px in 0..RES {
            let u = px as f64 / (RES - 1) as f64;
            let v = 1.0 - py as f64 / (RES - 1) as f64;
            let s_raw = 2.0 * u - 1.0;
            let t_raw = 2.0 * v - 1.0;
            // Inverse of face 5 (-Z)'s forward mapping: s = -dx/m, t = -dy/m, dz = -m.
            let dir = Vec3::new(-s_raw, -t_raw, -1.0).normalized();
            let (face, _, _) = cubemap_face_and_uv(dir);
            debug_assert_eq!(face, 5);
            neg_z_face.set(px, py, gradient_color(dir), false);
        }
    }

    let blank = Image::new(RES, RES);
    let faces = [
        ImageSource::Ldr(blank.clone()),
        ImageSource::Ldr(blank.clone()),
        ImageSource::Ldr(blank.clone()),
        ImageSource::Ldr(blank.clone()),
        ImageSource::Ldr(blank),
        ImageSource::Ldr(neg_z_face),
    ];

    let mut scene = Scene::new();
    let cubemap = scene.add_texture(Texture::Cubemap { faces });
    scene.set_skybox(Skybox::Texture(cubemap));

    let config = straight_on_camera(1, 1);
    let ctx = RenderContext::build(config, 64, 36);
    let (image, _) = render(&scene, &ctx, 64, 36, true);

    // Sample a narrow central column, where dz stays dominant, top to bottom.
    let x = 32;
    let samples: Vec<f64> = (10..26).map(|y| linear(image.get(x, y)).x).collect();

    let mut non_increasing_run = true;
    for pair in samples.windows(2) {
        if pair[1] > pair[0] + 0.02 {
            non_increasing_run = false;
            break;
        }
    }
    let first = *samples.first().unwrap();
    let last = *samples.last().unwrap();
    assert!(non_increasing_run, "vertical gradient should trend monotonically, got {samples:?}");
    assert!((first - last).abs() > 0.05, "top and bottom of the column should differ, got {first} vs {last}");
}

// S3 — a single diffuse sphere under a white skybox: the mean of the
// central patch should sit near one-half (diffuse half-space, one-bounce).
#[test]
fn s3_white_lambertian_sphere_under_white_sky_has_half_intensity_core() {
    let mut scene = Scene::new();
    let mat = scene.add_material(Material::Lambertian(Lambertian {
        albedo: Albedo::Color(Color::ones()),
        smoothness: 0.0,
        specular_probability: 0.0,
        normal_map: None,
        normal_strength: 1.0,
    }));
    scene.add_object(Object::Sphere(Sphere::new(Point3::new(0.0, 0.0, -1.0), 1.0, mat)));
    scene.set_skybox(Skybox::Color(Color::ones()));

    let config = straight_on_camera(16, 8);
    let ctx = RenderContext::build(config, 128, 128);
    let (image, _) = render(&scene, &ctx, 128, 128, true);

    let mean = patch_mean(&image, 60, 60, 8, 8);
    assert!(mean.x > 0.35 && mean.x < 0.65, "mean was {}", mean.x);
}

// S4 — a perfect mirror sphere facing the camera under a constant skybox
// reflects that exact color back, since attenuation is 1 and the skybox
// doesn't vary with direction.
#[test]
fn s4_mirror_sphere_reflects_constant_skybox_exactly() {
    let mut scene = Scene::new();
    let mat = scene.add_material(Material::Metal(Metal {
        albedo: Albedo::Color(Color::ones()),
        smoothness: 1.0,
    }));
    scene.add_object(Object::Sphere(Sphere::new(Point3::new(0.0, 0.0, -1.0), 1.0, mat)));
    let sky = Color::new(0.5, 0.7, 1.0);
    scene.set_skybox(Skybox::Color(sky));

    let config = straight_on_camera(32, 8);
    let ctx = RenderContext::build(config, 128, 128);
    let (image, _) = render(&scene, &ctx, 128, 128, true);

    let center = linear(image.get(64, 64));
    assert!((center.x - sky.x).abs() < 0.02);
    assert!((center.y - sky.y).abs() < 0.02);
    assert!((center.z - sky.z).abs() < 0.02);
}

// S5 — a receiver quad facing a light quad more directly should receive
// more illumination than one facing it obliquely (relative cos-falloff check).
#[test]
fn s5_receiver_illumination_increases_as_it_faces_the_light_more_directly() {
    fn render_receiver_mean(receiver_normal_tilt: f64) -> f64 {
        let mut scene = Scene::new();

        let light_mat = scene.add_material(Material::DiffuseLight(DiffuseLight {
            emission: Albedo::Color(Color::new(8.0, 8.0, 8.0)),
        }));
        scene.add_object(Object::Quad(Quad::new(
            Point3::new(-1.0, 2.0, -3.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            light_mat,
            false,
        )));

        let receiver_mat = scene.add_material(Material::Lambertian(Lambertian {
            albedo: Albedo::Color(Color::ones()),
            smoothness: 0.0,
            specular_probability: 0.0,
            normal_map: None,
            normal_strength: 1.0,
        }));
        // Tilt the receiver's spanning vectors so its normal rotates away
        // from facing the light directly as `receiver_normal_tilt` grows.
        let tilt = receiver_normal_tilt;
        scene.add_object(Object::Quad(Quad::new(
            Point3::new(-1.0, -1.0, -3.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, tilt.cos(), tilt.sin()),
            receiver_mat,
            false,
        )));

        let config = CameraConfig {
            samples: 32,
            max_depth: 4,
            look_from: Point3::new(0.0, 0.5, 2.0),
            look_at: Point3::new(0.0, -0.5, -3.0),
            vfov_degrees: 60.0,
            defocus_angle_degrees: 0.0,
            focus_dist: 5.0,
        };
        let ctx = RenderContext::build(config, 64, 64);
        let (image, _) = render(&scene, &ctx, 64, 64, true);
        patch_mean(&image, 28, 40, 8, 8).x
    }

    let facing_directly = render_receiver_mean(0.0);
    let facing_obliquely = render_receiver_mean(1.3);
    assert!(
        facing_directly > facing_obliquely,
        "direct-facing patch ({facing_directly}) should be brighter than oblique ({facing_obliquely})"
    );
}

// S6 — a dielectric sphere over a checker ground produces a visibly
// refracted disturbance: the patch under the sphere differs from a patch
// beside it by more than a small threshold.
#[test]
fn s6_dielectric_sphere_disturbs_checker_ground_beneath_it() {
    let mut scene = Scene::new();

    let dark = scene.add_texture(Texture::Solid(Color::new(0.1, 0.1, 0.1)));
    let light = scene.add_texture(Texture::Solid(Color::new(0.9, 0.9, 0.9)));
    let checker = scene.add_texture(Texture::Checker3D {
        scale: 4.0,
        even: light,
        odd: dark,
    });
    let ground_mat = scene.add_material(Material::Lambertian(Lambertian {
        albedo: Albedo::Texture(checker),
        smoothness: 0.0,
        specular_probability: 0.0,
        normal_map: None,
        normal_strength: 1.0,
    }));
    scene.add_object(Object::Sphere(Sphere::new(Point3::new(0.0, -1000.5, -1.0), 1000.0, ground_mat)));

    let glass_mat = scene.add_material(Material::Dielectric(Dielectric {
        ior: 1.5,
        tint: Color::ones(),
        smoothness: 0.0,
    }));
    scene.add_object(Object::Sphere(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, glass_mat)));

    scene.set_skybox(Skybox::Color(Color::new(0.6, 0.7, 0.9)));

    let config = straight_on_camera(32, 12);
    let ctx = RenderContext::build(config, 128, 128);
    let (image, _) = render(&scene, &ctx, 128, 128, true);

    let not_black = (0..128)
        .flat_map(|y| (0..128).map(move |x| (x, y)))
        .any(|(x, y)| image.get(x, y) != Color::zero());
    assert!(not_black);

    let under_sphere = patch_mean(&image, 60, 80, 4, 4);
    let beside_sphere = patch_mean(&image, 10, 80, 4, 4);
    let diff = (under_sphere.x - beside_sphere.x).abs()
        + (under_sphere.y - beside_sphere.y).abs()
        + (under_sphere.z - beside_sphere.z).abs();
    assert!(diff > 0.02, "refraction should be observable, diff was {diff}");
}
